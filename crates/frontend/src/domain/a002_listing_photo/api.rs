use contracts::domain::a002_listing_photo::{BulkDeleteErrorBody, BulkDeleteRequest, BulkDeleteResponse};
use gloo_net::http::Request;

use super::error::PhotoDeleteError;
use crate::shared::api_utils::{form_urlencoded, CSRF_HEADER};

/// Массовое удаление фотографий объекта
///
/// # Arguments
/// * `url` - адрес обработчика из `data-delete-url`
/// * `request` - объект и id фотографий
/// * `csrf_token` - токен со страницы, если найден
pub async fn bulk_delete(
    url: &str,
    request: &BulkDeleteRequest,
    csrf_token: Option<&str>,
) -> Result<BulkDeleteResponse, PhotoDeleteError> {
    let body = form_urlencoded(&request.form_fields());

    let mut builder = Request::post(url)
        .header("Content-Type", "application/x-www-form-urlencoded; charset=UTF-8")
        .header("X-Requested-With", "XMLHttpRequest");
    if let Some(token) = csrf_token {
        builder = builder.header(CSRF_HEADER, token);
    }

    let response = builder
        .body(body)
        .map_err(|e| PhotoDeleteError::Network(format!("failed to build request: {}", e)))?
        .send()
        .await
        .map_err(|e| PhotoDeleteError::Network(e.to_string()))?;

    let text = response
        .text()
        .await
        .map_err(|e| PhotoDeleteError::InvalidResponse(e.to_string()))?;

    if !response.ok() {
        return Err(PhotoDeleteError::Server {
            status: response.status(),
            code: BulkDeleteErrorBody::code_from(&text),
        });
    }

    parse_success(&text)
}

fn parse_success(text: &str) -> Result<BulkDeleteResponse, PhotoDeleteError> {
    serde_json::from_str::<BulkDeleteResponse>(text)
        .map_err(|e| PhotoDeleteError::InvalidResponse(e.to_string()))
}
