//! Domain models shared by the fetchers, the resolver and the web layer

pub mod image;
pub mod token_list;

pub use image::ImageResource;
pub use token_list::{TokenListDocument, TokenRecord};
