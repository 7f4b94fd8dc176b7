//! MongoDB driver implementation for docstore.
//!
//! This crate implements the `DocumentDriver` trait on top of the official
//! MongoDB async driver, binding one adapter to one collection.
//!
//! To use this driver, include the `mongodb` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! docstore = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Normalization
//!
//! Driver responses are normalized before they reach the adapter: bulk-insert
//! identifiers are returned in input order regardless of the driver's
//! index-keyed representation, and multi-update summaries always carry the
//! four matched/modified/upserted fields even where the driver omits a count.
//!
//! # Example
//!
//! ```ignore
//! use docstore::mongodb::MongoDriver;
//! use docstore_core::driver::DriverBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let driver = MongoDriver::builder("mongodb://localhost:27017", "app", "users")
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docstore_mongodb;

pub mod driver;
pub mod options;

pub use driver::{MongoDriver, MongoDriverBuilder};
