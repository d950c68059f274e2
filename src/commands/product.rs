use clap::{Args, Subcommand};
use std::sync::Arc;
use storefront::config::Config;
use storefront_core::form::DEFAULT_IMAGE_URL;
use storefront_core::{Category, DocumentStore, ProductForm, ProductSlice};

use super::{ConsoleNotifier, OutputFormat};

#[derive(Args)]
pub struct ProductCommand {
    #[command(subcommand)]
    pub command: ProductSubcommand,
}

#[derive(Subcommand)]
pub enum ProductSubcommand {
    /// Add a new product
    Add {
        /// Product name
        #[arg(long)]
        name: String,

        /// Price
        #[arg(long)]
        price: f64,

        /// Description
        #[arg(long)]
        description: String,

        /// Category (all, Ethinic, Tops, Kurti, Ambrella, Nayra, Pant, Dupatta)
        #[arg(long)]
        category: Option<Category>,

        /// Units in stock
        #[arg(long, default_value_t = 0)]
        stock: u32,

        /// Image URL (validated, not stored)
        #[arg(long, default_value = DEFAULT_IMAGE_URL)]
        image_url: String,
    },

    /// List all products
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl ProductCommand {
    pub async fn run(
        &self,
        store: Arc<dyn DocumentStore>,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ProductSubcommand::Add {
                name,
                price,
                description,
                category,
                stock,
                image_url,
            } => {
                let mut form = add_form(name, *price, description, *category, *stock, image_url);

                let session = config.session();
                let product = form
                    .submit(&*store, &session, &ConsoleNotifier)
                    .await?;

                println!("Created product:");
                println!("{}", product);
                Ok(())
            }

            ProductSubcommand::List { format } => {
                let slice = ProductSlice::new(store);
                let products = slice.fetch_all_products().await?;

                if products.is_empty() {
                    println!("No products found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&products)?);
                    }
                    OutputFormat::Text => {
                        println!(
                            "{:<16}  {:<30}  {:>10}  {:<10}  STOCK",
                            "ID", "NAME", "PRICE", "CATEGORY"
                        );
                        println!("{}", "-".repeat(80));
                        for product in &products {
                            let name = if product.name.chars().count() > 30 {
                                let short: String = product.name.chars().take(27).collect();
                                format!("{}...", short)
                            } else {
                                product.name.clone()
                            };
                            println!(
                                "{:<16}  {:<30}  {:>10.2}  {:<10}  {}",
                                product.id.as_str(), name, product.price, product.category, product.stock
                            );
                        }
                        println!("\nTotal: {} product(s)", products.len());
                    }
                }
                Ok(())
            }
        }
    }
}

/// Fills the form from command-line input as given. Whitespace is kept, so
/// presence checks see exactly what was typed.
fn add_form(
    name: &str,
    price: f64,
    description: &str,
    category: Option<Category>,
    stock: u32,
    image_url: &str,
) -> ProductForm {
    ProductForm {
        name: name.to_string(),
        price,
        description: description.to_string(),
        category: category.map(|c| c.as_str().to_string()).unwrap_or_default(),
        stock,
        image_url: image_url.to_string(),
    }
}
