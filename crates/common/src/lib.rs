//! Common utilities and shared types for chirp.
//!
//! This crate provides foundational components used across all chirp crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Tokens**: Session-scoped CSRF token minting via [`generate_csrf_token`]
//!
//! # Example
//!
//! ```no_run
//! use chirp_common::{AppResult, Config};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     println!("Listening on {}:{}", config.server.host, config.server.port);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod token;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use token::generate_csrf_token;
