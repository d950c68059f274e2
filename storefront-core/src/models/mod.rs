mod category;
mod lenient;
mod product;
mod wishlist;

pub use category::Category;
pub use product::{localized_timestamp, Product, DEFAULT_RATING};
pub use wishlist::{WishlistEntry, WishlistPolicy, WISHLIST_FIELD};
