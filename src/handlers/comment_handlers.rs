use std::sync::Arc;

use axum::{extract::Path, http::StatusCode, Extension, Json};
use sqlx::SqlitePool;

use crate::{
    authentication::{AuthUser, MaybeUser},
    data_formats::{CommentRequest, CommentResponse, CommentWrapper, MultipleCommentsWrapper},
    db_helpers::{
        add_comment_to_article_in_db, delete_comment_in_db, get_comments_for_article_in_db,
    },
    errors::RequestError,
};

use super::JsonResult;

pub async fn add_comment(
    auth: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(slug): Path<String>,
    Json(CommentWrapper { comment }): Json<CommentWrapper<CommentRequest>>,
) -> JsonResult<CommentWrapper<CommentResponse>> {
    if comment.body.trim().is_empty() {
        return Err(RequestError::Validation("body", "can't be blank"));
    }
    let comment = add_comment_to_article_in_db(&pool, auth.id, &slug, &comment.body).await?;
    Ok(Json(CommentWrapper {
        comment: CommentResponse::new(comment),
    }))
}

pub async fn list_comments(
    Extension(pool): Extension<Arc<SqlitePool>>,
    maybe_user: MaybeUser,
    Path(slug): Path<String>,
) -> JsonResult<MultipleCommentsWrapper> {
    let comments = get_comments_for_article_in_db(&pool, maybe_user.get_id(), &slug).await?;
    Ok(Json(MultipleCommentsWrapper {
        comments: comments.into_iter().map(CommentResponse::new).collect(),
    }))
}

pub async fn delete_comment(
    auth: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path((slug, comment_id)): Path<(String, i64)>,
) -> Result<StatusCode, RequestError> {
    delete_comment_in_db(&pool, auth.id, &slug, comment_id).await?;
    Ok(StatusCode::OK)
}
