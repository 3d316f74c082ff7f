pub mod helpers;
pub mod op;
mod price;
mod secret;

pub use price::Price;
pub use secret::Secret;
