pub mod types;

pub use types::{ApiError, ErrorResponse, ErrorType, Extra};
