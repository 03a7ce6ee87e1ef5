use axum::response::Response;
use http_body_util::BodyExt;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde_json::json;

// 1x1 transparent PNG
pub const PNG_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

/// Parse response body to JSON
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Build an upload request body
pub fn create_upload_request(image: &str, folder_name: &str, entity_name: &str) -> serde_json::Value {
    json!({
        "image": image,
        "folder_name": folder_name,
        "entity_name": entity_name,
    })
}

/// Route for resolving the URL of an object
pub fn url_route(object_name: &str) -> String {
    format!(
        "/v1/images/url?object_name={}",
        utf8_percent_encode(object_name, NON_ALPHANUMERIC)
    )
}
