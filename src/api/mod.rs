pub mod client;
pub mod types;

pub use client::{ApiClient, ApiError, BlockSource, QueryRows};
pub use types::{Block, Page, RichText};
