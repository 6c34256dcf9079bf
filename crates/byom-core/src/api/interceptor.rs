//! Interception points of the request pipeline.
//!
//! Request interceptors run in registration order on the fully built
//! request immediately before it is handed to the transport. Response
//! interceptors run in registration order on every outcome, successful or
//! not, before the caller sees it. Neither kind can alter or swallow the
//! outcome: response interceptors only observe.

use reqwest::{Method, Request, StatusCode, Url};

pub trait RequestInterceptor: Send + Sync {
    fn intercept(&self, request: &mut Request);
}

pub trait ResponseInterceptor: Send + Sync {
    fn intercept(&self, response: &ResponseInfo<'_>);
}

/// What response interceptors get to see of a completed exchange.
#[derive(Debug, Clone, Copy)]
pub struct ResponseInfo<'a> {
    pub method: &'a Method,
    pub url: &'a Url,
    /// `None` when the transport failed before any response arrived
    pub status: Option<StatusCode>,
}

impl ResponseInfo<'_> {
    pub fn is_transport_failure(&self) -> bool {
        self.status.is_none()
    }
}
