//! HTML pages: product list, product detail and search.

use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use storefront_common::Currency;
use tracing::{debug, info};

use crate::catalog::Product;
use crate::error::ErrorResponse;
use crate::routes::context::RequestContext;
use crate::state::AppState;
use crate::views::{self, HomePage, PageContext, PricedProduct, ProductPage, SearchPage};

/// Query parameters for product search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

fn price<'a>(state: &AppState, ctx: &RequestContext, item: &'a Product) -> PricedProduct<'a> {
    let conversion = state.fx.convert(&item.price_usd, &ctx.currency);
    state.metrics.conversion(&conversion);
    if !conversion.is_priced() {
        debug!(product = %item.id, currency = %ctx.currency, "No rate for product price");
    }
    PricedProduct {
        item,
        price: conversion.into_money(),
    }
}

fn page_context<'a>(
    state: &'a AppState,
    ctx: &'a RequestContext,
    currencies: &'a [Currency],
) -> PageContext<'a> {
    PageContext {
        request_id: &ctx.request_id,
        user_currency: &ctx.currency,
        currencies,
        cart_size: ctx.cart_size,
        banner_color: &state.config.banner_color,
    }
}

/// GET `/` - product list priced in the visitor's currency.
pub async fn home(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Html<String>, ErrorResponse> {
    let currencies = state.fx.currencies();
    let products: Vec<PricedProduct<'_>> = state
        .catalog
        .list()
        .iter()
        .map(|item| price(&state, &ctx, item))
        .collect();

    info!(
        currency = %ctx.currency,
        currencies = currencies.len(),
        products = products.len(),
        "home handler"
    );

    let page = HomePage {
        page: page_context(&state, &ctx, &currencies),
        products,
    };
    state.metrics.page_rendered();
    views::render(&page).map_err(|e| ctx.fail(e))
}

/// GET `/product/{id}` - product detail, or the raw product with `?json=1`.
pub async fn product(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Response, ErrorResponse> {
    debug!(id = %id, currency = %ctx.currency, "serving product page");

    let item = state.catalog.get(&id).map_err(|e| ctx.fail(e))?;

    if ctx.wants_json {
        return Ok(Json(item.clone()).into_response());
    }

    let currencies = state.fx.currencies();
    let page = ProductPage {
        page: page_context(&state, &ctx, &currencies),
        product: price(&state, &ctx, item),
    };
    state.metrics.page_rendered();
    Ok(views::render(&page).map_err(|e| ctx.fail(e))?.into_response())
}

/// GET `/search?q=` - products matching a query.
pub async fn search(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<SearchQuery>,
) -> Result<Response, ErrorResponse> {
    let matches = state.catalog.search(&query.q);
    debug!(query = %query.q, matches = matches.len(), "search handler");

    if ctx.wants_json {
        let products: Vec<Product> = matches.into_iter().cloned().collect();
        return Ok(Json(products).into_response());
    }

    let currencies = state.fx.currencies();
    let page = SearchPage {
        page: page_context(&state, &ctx, &currencies),
        query: &query.q,
        products: matches
            .into_iter()
            .map(|item| price(&state, &ctx, item))
            .collect(),
    };
    state.metrics.page_rendered();
    Ok(views::render(&page).map_err(|e| ctx.fail(e))?.into_response())
}
