//! Domain-specific error types for rate-tracker
//!
//! # Error Categories
//!
//! - **StorageError**: series name resolution and CSV file access
//! - **RenderError**: chart and page template rendering
//!
//! # Examples
//!
//! ```rust
//! use rate_tracker::errors::StorageError;
//!
//! let err = StorageError::InvalidName("../escape".to_string());
//! assert!(err.is_client_error());
//! ```

pub mod render;
pub mod storage;

pub use render::RenderError;
pub use storage::StorageError;

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
