#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

//! # HopCache Client
//!
//! A typed Rust client for the HopCache remote key-value cache.
//!
//! ## Architecture
//!
//! This library is organized into several key modules:
//!
//! - **[`error`]** - Error taxonomy and error handling
//! - **[`config`]** - Configuration and its TOML persistence
//! - **[`value`]** - The serializable value domain for cache entries
//! - **[`codec`]** - The JSON + base64 wire codec
//! - **[`client`]** - The HTTP client and reply types
//! - **[`cli`]** - Command-line argument definitions for the `hopcache` binary
//!
//! ## Quick Start
//!
//! ```bash
//! hopcache set user:1 '{"name":"Ada"}'   # Store a record
//! hopcache get user:1                    # Fetch it back
//! hopcache delete user:1                 # Remove it
//! ```

pub mod cli;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod value;

/// Client and acknowledgement types re-exported for convenience
pub use client::{response::Ack, CacheClient};

/// Configuration type re-exported for convenience
pub use config::Config;

/// Error types re-exported for convenience
pub use error::{ClientError, Result};

/// Value type re-exported for convenience
pub use value::CacheValue;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = "hopcache";
