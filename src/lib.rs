//! url2epub: save one web page as a single-chapter EPUB. Also hosts the crypto-price lookup.

pub mod cli;
pub mod config;
pub mod epub;
pub mod extract;
pub mod fetch;
pub mod logging;
pub mod model;
pub mod price;

// Re-exports for CLI and consumers.
pub use epub::{write_epub, EpubError, Package};
pub use extract::extract;
pub use fetch::{fetch_page, FetchError, HttpClient, HttpClientBuilder};
pub use model::{Document, ExtractionMode, Layout};
pub use price::{format_usd, render_quote, PriceClient, PriceError};
