use axum::http::{StatusCode, Uri};

mod article_handlers;
mod comment_handlers;
mod profile_handlers;
mod tag_handlers;
mod user_handlers;

pub use article_handlers::*;
pub use comment_handlers::*;
pub use profile_handlers::*;
pub use tag_handlers::*;
pub use user_handlers::*;

use crate::errors::RequestError;

type JsonResult<T> = Result<axum::Json<T>, RequestError>;

// ----------------- Helper Handlers -----------------
pub async fn alive() -> &'static str {
    "alive"
}

pub async fn not_found(uri: Uri) -> Result<(), (StatusCode, String)> {
    Err((
        StatusCode::NOT_FOUND,
        format!("URL {} provided was not found", uri),
    ))
}
