//! News source access.
//!
//! This module fetches raw headline articles from NewsAPI.

mod client;
mod types;

pub use self::client::{parse_response, NewsApiClient};
pub use self::types::*;
