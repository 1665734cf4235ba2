//! Centralized error handling for the token list resolver
//!
//! Two layers of errors exist:
//!
//! - **Fetch Errors**: everything that can go wrong while retrieving a single
//!   upstream document or image (transport, HTTP status, timeout, parse,
//!   validation). These never leave the fetchers; they are logged and
//!   collapsed into "unavailable".
//! - **Application Errors**: configuration problems at start-up and internal
//!   failures of the traversal itself, which surface as `500` responses.
//!
//! # Usage
//!
//! ```rust
//! use btkn_info::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Err(AppError::internal("visited set unavailable"))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for upstream fetch Results
pub type FetchResult<T> = Result<T, FetchError>;
