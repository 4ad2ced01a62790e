mod client;
mod error;
mod types;

pub use client::{DEFAULT_ENDPOINT, FeedClient};
pub use error::ApiError;
pub use types::{FeedItem, PageRequest};
