//! JSON body extractors that reject in the shape of the route they serve.
//!
//! axum's plain `Json` answers a bad body with `text/plain`; these keep the
//! envelope on `/api/v1` and the bare `{error}` body on the proxy routes.

use axum::extract::FromRequest;

use crate::http::error::{AppError, ProxyFailure};

/// Request body of an `/api/v1` route.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Request body of a proxy route (`/chat`, `/api/finley`).
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ProxyFailure))]
pub struct ProxyJson<T>(pub T);
