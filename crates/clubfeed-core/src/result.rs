//! Convenience result type alias for ClubFeed.

use crate::error::AppError;

/// A specialized `Result` type for ClubFeed operations.
pub type AppResult<T> = Result<T, AppError>;
