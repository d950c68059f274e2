use clap::{Args, Subcommand};
use std::sync::Arc;
use storefront::config::Config;
use storefront_core::{DocumentStore, ProductId, ProductSlice, WishlistEntry, WishlistPolicy};

#[derive(Args)]
pub struct WishlistCommand {
    #[command(subcommand)]
    pub command: WishlistSubcommand,
}

#[derive(Subcommand)]
pub enum WishlistSubcommand {
    /// Add a product to a user's wishlist
    Add {
        /// Product ID
        #[arg(long)]
        product: ProductId,

        /// User ID (defaults to the configured user)
        #[arg(long)]
        user: Option<String>,
    },
}

impl WishlistCommand {
    pub async fn run(
        &self,
        store: Arc<dyn DocumentStore>,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            WishlistSubcommand::Add { product, user } => {
                let user_id = match user {
                    Some(id) => id.clone(),
                    None => config
                        .auth
                        .uid
                        .value
                        .clone()
                        .ok_or("No user given and no auth.uid configured")?,
                };

                let policy = config.wishlist_policy.value;
                let slice = ProductSlice::new(store).with_policy(policy);
                let entry = slice
                    .add_to_wishlist(WishlistEntry::new(user_id, product.clone()))
                    .await?;

                println!(
                    "Added product {} to wishlist of {}",
                    entry.product_id, entry.user_id
                );
                if policy == WishlistPolicy::Append {
                    println!("Wishlist now holds {} product(s)", slice.wishlist().len());
                }
                Ok(())
            }
        }
    }
}
