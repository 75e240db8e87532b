//! `SubmitterContext` — a typed extension point for whatever auth layer
//! eventually sits in front of this service. No token is verified here;
//! the extractor only reads whatever headers an upstream proxy or client
//! already set, so downstream code never has to care whether that
//! upstream is a real auth gateway or a test harness.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use bugtriage_core::models::bug::SubmissionContext;
use std::convert::Infallible;

pub struct SubmitterContext(pub SubmissionContext);

#[async_trait]
impl<S> FromRequestParts<S> for SubmitterContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        Ok(SubmitterContext(SubmissionContext {
            submitter_id: header("x-submitter-id"),
            api_key_id: header("x-api-key-id"),
            ip: header("x-forwarded-for"),
            user_agent: header("user-agent"),
            is_automated: header("x-automated-client").as_deref() == Some("true"),
            client_version: header("x-client-version"),
        }))
    }
}
