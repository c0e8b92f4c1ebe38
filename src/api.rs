mod backend;
mod client;
mod config;
mod error;
mod response;

pub use backend::CourseBackend;
pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::{created_id, RequestError};
pub use response::{ApiResponse, ResponseStatus};
