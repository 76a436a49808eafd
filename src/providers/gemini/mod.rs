//! Google Gemini Provider
//!
//! # Architecture
//! - `client.rs` - `GenerativeProvider` implementation over `generateContent` and Imagen `predict`
//! - `builder.rs` - Builder resolving credentials from arguments or the environment
//! - `headers.rs` - Request header construction
//! - `types/` - Wire types split by concern
//!
//! # Example Usage
//! ```rust,no_run
//! use atelier::providers::gemini::GeminiBuilder;
//! use atelier::traits::GenerativeProvider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GeminiBuilder::new().api_key("your-api-key").build()?;
//!     let text = client.generate_text("Name three Bauhaus typefaces").await?;
//!     println!("{text}");
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod client;
pub mod headers;
pub mod types;

pub use builder::GeminiBuilder;
pub use client::GeminiClient;
pub use types::GeminiConfig;
