pub mod error;
pub mod time_value;
pub mod types;

pub mod real_estate;

pub use error::UnderwritingError;
pub use types::*;

/// Standard result type for all underwriting operations
pub type UnderwritingResult<T> = Result<T, UnderwritingError>;
