#![forbid(unsafe_code)]

pub mod configs;
pub mod core;
pub mod db;
pub mod env;
pub mod routes;
pub mod services;
pub mod types;

pub use self::env::logger;

/// Header Constants
pub mod headers {
    pub const CONTENT_TYPE: &str = "Content-Type";
    pub const X_API_CLIENT_ID: &str = "x-api-client-id";
    pub const X_IDEMPOTENCY_KEY: &str = "x-idempotency-key";
}
