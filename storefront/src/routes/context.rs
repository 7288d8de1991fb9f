//! Per-request values shared by page and API handlers.

use std::collections::HashMap;
use std::convert::Infallible;

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;
use storefront_common::Currency;

use crate::error::{AppError, ErrorResponse};
use crate::state::AppState;

/// Visitor's chosen display currency.
pub const COOKIE_CURRENCY: &str = "shop_currency";
/// Number of items in the visitor's cart.
pub const COOKIE_CART_SIZE: &str = "shop_cart_size";
/// Lifetime of the currency cookie, in seconds.
pub const COOKIE_MAX_AGE_SECS: i64 = 60 * 60 * 48;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Resolved request context.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Correlation ID assigned by the request-id layer.
    pub request_id: String,
    /// Caller asked for JSON via `?json=...`.
    pub wants_json: bool,
    /// Display currency for this visitor.
    pub currency: Currency,
    /// Items in the cart, for display.
    pub cart_size: usize,
}

impl RequestContext {
    /// Wrap an error for this request.
    pub fn fail(&self, error: impl Into<AppError>) -> ErrorResponse {
        ErrorResponse {
            error: error.into(),
            json: self.wants_json,
            request_id: self.request_id.clone(),
        }
    }

    /// Wrap an error for this request, always as JSON.
    pub fn fail_json(&self, error: impl Into<AppError>) -> ErrorResponse {
        ErrorResponse {
            json: true,
            ..self.fail(error)
        }
    }
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let request_id = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let wants_json = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
            .map(|Query(params)| params.get("json").is_some_and(|v| !v.is_empty()))
            .unwrap_or(false);

        let jar = CookieJar::from_headers(&parts.headers);
        let currency = state.resolve_currency(jar.get(COOKIE_CURRENCY).map(|c| c.value()));
        let cart_size = jar
            .get(COOKIE_CART_SIZE)
            .and_then(|c| c.value().parse().ok())
            .unwrap_or(0);

        Ok(Self {
            request_id,
            wants_json,
            currency,
            cart_size,
        })
    }
}
