//! Error handling for the Marlin Rust client

use thiserror::Error;

/// Unified error type for the Marlin Rust client
#[derive(Error, Debug)]
pub enum Error {
    /// Transport, timeout and HTTP status errors
    #[error("API error: {0}")]
    Api(#[from] marlin_rust_core::ApiError),

    /// Authentication errors
    #[error("Auth error: {0}")]
    Auth(#[from] marlin_rust_auth::AuthError),

    /// Client-side input validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] marlin_rust_auth::ValidationError),

    /// News service errors
    #[error("News error: {0}")]
    News(#[from] marlin_rust_news::NewsError),

    /// Social service errors
    #[error("Social error: {0}")]
    Social(#[from] marlin_rust_social::SocialError),
}
