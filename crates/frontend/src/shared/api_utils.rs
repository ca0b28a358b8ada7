//! API utilities for requests back to the page's own server
//!
//! The form is served by the same origin that accepts its AJAX calls, so
//! endpoints come from the markup and only the CSRF token and the
//! form-encoded body need helpers here.

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlDocument};

use crate::shared::dom;

/// Name of the hidden input the server renders into forms
pub const CSRF_INPUT_NAME: &str = "csrfmiddlewaretoken";
/// Cookie carrying the same token when no hidden input is present
pub const CSRF_COOKIE_NAME: &str = "csrftoken";
/// Header the server reads the token from
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Find the CSRF token: hidden form field first, then cookie
///
/// # Returns
/// - `None` when neither source carries a non-empty token
pub fn csrf_token(document: &Document) -> Option<String> {
    let from_field = document
        .query_selector(&format!("input[name=\"{}\"]", CSRF_INPUT_NAME))
        .ok()
        .flatten()
        .map(|input| dom::element_value(&input))
        .filter(|token| !token.is_empty());

    from_field.or_else(|| {
        let cookies = document.dyn_ref::<HtmlDocument>()?.cookie().ok()?;
        cookie_value(&cookies, CSRF_COOKIE_NAME)
    })
}

/// Extract a cookie value from a `document.cookie` string
pub fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .map(|value| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Build an `application/x-www-form-urlencoded` body
///
/// # Example
/// ```rust
/// use frontend::shared::api_utils::form_urlencoded;
///
/// let body = form_urlencoded(&[("ids[]", "1"), ("ids[]", "2")]);
/// assert_eq!(body, "ids%5B%5D=1&ids%5B%5D=2");
/// ```
pub fn form_urlencoded(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}
