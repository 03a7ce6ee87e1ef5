mod environment;
mod error;

pub use environment::{Environment, EnvironmentError, DEFAULT_PORT};
pub use error::{ApiErrorResponse, AppError};
