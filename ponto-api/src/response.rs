//! The `{ data, errors }` envelope every endpoint answers with.
//!
//! Clients must treat a non-empty `errors` list as failure regardless of the
//! HTTP status; `data` is `null` whenever `errors` is non-empty.

use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub errors: Vec<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            data: Some(data),
            errors: Vec::new(),
        }
    }

    pub fn from_errors(errors: Vec<String>) -> Self {
        ApiResponse { data: None, errors }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::from_errors(vec![message.into()])
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Handler return type: an envelope with an explicit status code.
pub type Envelope<T> = status::Custom<Json<ApiResponse<T>>>;

/// 200 with `data` populated.
pub fn ok<T>(data: T) -> Envelope<T> {
    status::Custom(Status::Ok, Json(ApiResponse::ok(data)))
}

/// Any non-2xx status with the given error messages.
pub fn fail<T>(status: Status, errors: Vec<String>) -> Envelope<T> {
    status::Custom(status, Json(ApiResponse::from_errors(errors)))
}

/// 400 carrying every collected validation/conflict message.
pub fn bad_request<T>(errors: Vec<String>) -> Envelope<T> {
    fail(Status::BadRequest, errors)
}

/// One page of a larger ordered result set.
#[derive(Debug, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: i64,
    pub total_pages: i64,
    /// Zero-based page index.
    pub number: i64,
    pub size: i64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, total_elements: i64, number: i64, size: i64) -> Self {
        let total_pages = if size > 0 {
            (total_elements + size - 1) / size
        } else {
            0
        };
        Page {
            content,
            total_elements,
            total_pages,
            number,
            size,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            number: self.number,
            size: self.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_serializes_null_data_on_error() {
        let response: ApiResponse<i32> = ApiResponse::error("Empresa já existente.");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["data"], serde_json::Value::Null);
        assert_eq!(json["errors"][0], "Empresa já existente.");
        assert!(response.has_errors());
    }

    #[test]
    fn test_envelope_ok_has_empty_errors() {
        let response = ApiResponse::ok("payload");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["data"], "payload");
        assert_eq!(json["errors"].as_array().unwrap().len(), 0);
        assert!(!response.has_errors());
    }

    #[test]
    fn test_page_counts_partial_last_page() {
        let page = Page::new(vec![1, 2, 3], 51, 0, 25);
        assert_eq!(page.total_pages, 3);
        let empty: Page<i32> = Page::new(Vec::new(), 0, 0, 25);
        assert_eq!(empty.total_pages, 0);
        let mapped = page.map(|n| n * 2);
        assert_eq!(mapped.content, vec![2, 4, 6]);
    }
}
