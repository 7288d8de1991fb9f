//! Cookie-backed visitor session: currency preference and logout.

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Form;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use storefront_common::Currency;
use tracing::{debug, info, warn};

use crate::routes::context::{RequestContext, COOKIE_CURRENCY, COOKIE_MAX_AGE_SECS};
use crate::state::AppState;

/// Form body for changing the display currency.
#[derive(Debug, Deserialize)]
pub struct SetCurrencyForm {
    #[serde(default)]
    pub currency_code: String,
}

fn found(location: &str) -> (StatusCode, [(header::HeaderName, String); 1]) {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())])
}

/// POST `/setCurrency` - store the visitor's currency and go back.
pub async fn set_currency(
    State(state): State<AppState>,
    ctx: RequestContext,
    jar: CookieJar,
    headers: HeaderMap,
    Form(form): Form<SetCurrencyForm>,
) -> Response {
    info!(curr.new = %form.currency_code, curr.old = %ctx.currency, "setting currency");

    let mut jar = jar;
    let requested = form.currency_code.trim();
    if !requested.is_empty() {
        let currency = Currency::new(requested);
        if state.fx.is_allowed(&currency) {
            let cookie = Cookie::build((COOKIE_CURRENCY, currency.code().to_string()))
                .path("/")
                .max_age(time::Duration::seconds(COOKIE_MAX_AGE_SECS));
            jar = jar.add(cookie);
            state.metrics.currency_changed();
        } else {
            warn!(currency = %currency, "Ignoring unsupported currency");
        }
    }

    let referer = headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or("/");

    (jar, found(referer)).into_response()
}

/// GET `/logout` - expire every cookie the visitor sent.
pub async fn logout(jar: CookieJar) -> Response {
    debug!("logging out");

    let names: Vec<String> = jar
        .iter()
        .map(|c| c.name().to_string())
        .collect();

    let mut jar = jar;
    for name in names {
        jar = jar.remove(Cookie::build(name).path("/"));
    }

    (jar, found("/")).into_response()
}
