//! REST API client module for the BYOM AI Platform backend.
//!
//! This module provides the `ApiClient` and its interceptor pipeline. The
//! API uses bearer token authentication; tokens are obtained through the
//! `/auth` endpoints (see [`crate::auth::SessionService`]).

pub mod client;
pub mod error;
pub mod interceptor;
pub mod providers;

pub use client::{ApiClient, ApiClientBuilder, DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
pub use error::{ApiError, ErrorResponse};
pub use interceptor::{RequestInterceptor, ResponseInfo, ResponseInterceptor};
