pub mod client;
pub mod error;

pub use client::ApiClient;
pub use delfx_api;
pub use error::ApiError;
