//! JSON API: rate snapshot and price conversion.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use storefront_common::{Currency, Money};
use tracing::debug;

use crate::error::ErrorResponse;
use crate::routes::context::RequestContext;
use crate::state::AppState;

/// Response for a price conversion.
#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    #[serde(flatten)]
    pub money: Money,
    /// False when no rate was known and `money` is a zero placeholder.
    pub priced: bool,
}

/// GET `/rates` - current rates keyed by currency code.
pub async fn rates(State(state): State<AppState>) -> Json<BTreeMap<Currency, f64>> {
    Json(state.fx.rates())
}

/// GET `/convert/{currency_id}/{price}` - convert a price in the default
/// currency into `currency_id`.
pub async fn convert(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((currency_id, price)): Path<(String, String)>,
) -> Result<Json<ConvertResponse>, ErrorResponse> {
    let conversion = match state.fx.convert_request(&currency_id, &price) {
        Ok(conversion) => conversion,
        Err(e) => {
            debug!(currency = %currency_id, price = %price, "input parameters invalid");
            state.metrics.conversion_rejected();
            return Err(ctx.fail_json(e));
        }
    };

    state.metrics.conversion(&conversion);
    let priced = conversion.is_priced();
    Ok(Json(ConvertResponse {
        money: conversion.into_money(),
        priced,
    }))
}
