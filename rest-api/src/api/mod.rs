//! HTTP surface.

pub mod error;

pub use error::{ApiError, ApiResult};
