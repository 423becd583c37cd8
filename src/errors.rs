use std::collections::HashMap;

use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::JsonResponse;

#[derive(Debug)]
pub enum RequestError {
    NotFound(&'static str),
    NotAuthorized(&'static str),
    Conflict(&'static str, &'static str),
    Validation(&'static str, &'static str),
    ServerError,
    DatabaseError(sqlx::Error),
}

#[derive(serde::Serialize)]
pub struct RequestErrorJsonWrapper {
    errors: HashMap<&'static str, Vec<String>>,
}

impl RequestErrorJsonWrapper {
    pub fn new(key: &'static str, error: &str) -> RequestErrorJsonWrapper {
        RequestErrorJsonWrapper {
            errors: HashMap::from([(key, vec![error.to_string()])]),
        }
    }
}

impl From<sqlx::Error> for RequestError {
    fn from(value: sqlx::Error) -> Self {
        Self::DatabaseError(value)
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> axum::response::Response {
        self.to_json_response().into_response()
    }
}

impl RequestError {
    pub fn to_json_response(&self) -> JsonResponse<RequestErrorJsonWrapper> {
        let (status_code, json) = match self {
            RequestError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                RequestErrorJsonWrapper::new("message", message),
            ),
            RequestError::NotAuthorized(message) => (
                StatusCode::UNAUTHORIZED,
                RequestErrorJsonWrapper::new("message", message),
            ),
            RequestError::Conflict(field, message) => (
                StatusCode::CONFLICT,
                RequestErrorJsonWrapper::new(field, message),
            ),
            RequestError::Validation(field, message) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                RequestErrorJsonWrapper::new(field, message),
            ),
            RequestError::ServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                RequestErrorJsonWrapper::new("message", "Internal Server Error"),
            ),
            RequestError::DatabaseError(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    RequestErrorJsonWrapper::new("message", "Internal Server Error"),
                )
            }
        };
        (status_code, Json(json))
    }
}
