use std::sync::Arc;

use axum::{Extension, Json};
use sqlx::SqlitePool;

use crate::{data_formats::TagsWrapper, db_helpers::get_tags_in_db};

use super::JsonResult;

pub async fn list_tags(
    Extension(pool): Extension<Arc<SqlitePool>>,
) -> JsonResult<TagsWrapper> {
    let tags = get_tags_in_db(&pool).await?;
    Ok(Json(TagsWrapper { tags }))
}
