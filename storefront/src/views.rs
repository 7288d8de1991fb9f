//! HTML pages rendered from the templates in `storefront/templates`.

use askama::Template;
use axum::http::StatusCode;
use axum::response::Html;
use storefront_common::{Currency, Money};

use crate::catalog::Product;
use crate::error::AppError;

/// Values shared by every page.
pub struct PageContext<'a> {
    pub request_id: &'a str,
    pub user_currency: &'a Currency,
    pub currencies: &'a [Currency],
    pub cart_size: usize,
    pub banner_color: &'a str,
}

/// A product with its price in the visitor's currency.
pub struct PricedProduct<'a> {
    pub item: &'a Product,
    pub price: Money,
}

/// The product list page.
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomePage<'a> {
    pub page: PageContext<'a>,
    pub products: Vec<PricedProduct<'a>>,
}

/// A single product page.
#[derive(Template)]
#[template(path = "product.html")]
pub struct ProductPage<'a> {
    pub page: PageContext<'a>,
    pub product: PricedProduct<'a>,
}

/// Search results page.
#[derive(Template)]
#[template(path = "search.html")]
pub struct SearchPage<'a> {
    pub page: PageContext<'a>,
    pub query: &'a str,
    pub products: Vec<PricedProduct<'a>>,
}

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage<'a> {
    pub code: u16,
    pub reason: &'a str,
    pub message: &'a str,
    pub request_id: &'a str,
}

impl<'a> ErrorPage<'a> {
    pub fn new(status: StatusCode, message: &'a str, request_id: &'a str) -> Self {
        Self {
            code: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Error"),
            message,
            request_id,
        }
    }
}

/// Render a page template into a response body.
pub fn render(template: &impl Template) -> Result<Html<String>, AppError> {
    Ok(Html(template.render()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product {
            id: "OLJCESPC7Z".to_string(),
            name: "Tom & Jerry <mug>".to_string(),
            description: "A mug".to_string(),
            picture: "/static/img/mug.jpg".to_string(),
            price_usd: Money::from_parts(Currency::usd(), 8, 990_000_000),
            categories: vec!["kitchen".to_string(), "gifts".to_string()],
        }
    }

    fn page<'a>(currencies: &'a [Currency], user_currency: &'a Currency) -> PageContext<'a> {
        PageContext {
            request_id: "rid-1",
            user_currency,
            currencies,
            cart_size: 2,
            banner_color: "green",
        }
    }

    #[test]
    fn test_home_page_lists_prices_and_currencies() {
        let item = product();
        let currencies = vec![Currency::eur(), Currency::usd()];
        let html = HomePage {
            page: page(&currencies, &currencies[1]),
            products: vec![PricedProduct {
                item: &item,
                price: item.price_usd.clone(),
            }],
        }
        .render()
        .unwrap();

        assert!(html.contains("USD 8.99"));
        assert!(html.contains("Tom &amp; Jerry &lt;mug&gt;"));
        assert!(!html.contains("<mug>"));
        assert!(html.contains(r#"<option value="USD" selected>"#));
        assert!(html.contains(r#"<option value="EUR">"#));
        assert!(html.contains("Cart (2)"));
        assert!(html.contains("rid-1"));
    }

    #[test]
    fn test_product_page() {
        let item = product();
        let currencies = vec![Currency::jpy()];
        let html = ProductPage {
            page: page(&currencies, &currencies[0]),
            product: PricedProduct {
                item: &item,
                price: Money::from_parts(Currency::jpy(), 1168, 0),
            },
        }
        .render()
        .unwrap();

        assert!(html.contains("JPY 1168.00"));
        assert!(html.contains("kitchen, gifts"));
    }

    #[test]
    fn test_search_page_escapes_query() {
        let currencies = vec![Currency::usd()];
        let html = SearchPage {
            page: page(&currencies, &currencies[0]),
            query: "<script>",
            products: Vec::new(),
        }
        .render()
        .unwrap();

        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("(0)"));
    }

    #[test]
    fn test_error_page() {
        let html = ErrorPage::new(StatusCode::BAD_REQUEST, "price must not be zero", "rid-2")
            .render()
            .unwrap();
        assert!(html.contains("400 Bad Request"));
        assert!(html.contains("price must not be zero"));
        assert!(html.contains("rid-2"));
    }
}
