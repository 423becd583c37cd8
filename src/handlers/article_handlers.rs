use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Extension, Json,
};
use sqlx::SqlitePool;

use crate::{
    authentication::{AuthUser, MaybeUser},
    data_formats::{
        ArticleQueryParams, ArticleResponse, ArticleWrapper, CreateArticleRequest, FeedQueryParams,
        MultipleArticlesWrapper, UpdateArticleRequest,
    },
    db_helpers::{
        create_article_in_db, delete_article_in_db, favourite_article_in_db,
        get_article_by_slug_in_db, list_articles_in_db, list_feed_articles_in_db,
        unfavourite_article_in_db, update_article_in_db,
    },
    errors::RequestError,
};

use super::JsonResult;

type ArticleJson = ArticleWrapper<ArticleResponse>;

pub async fn list_articles(
    Extension(pool): Extension<Arc<SqlitePool>>,
    maybe_user: MaybeUser,
    Query(params): Query<ArticleQueryParams>,
) -> JsonResult<MultipleArticlesWrapper> {
    let (articles, articles_count) =
        list_articles_in_db(&pool, maybe_user.get_id(), params).await?;
    Ok(Json(MultipleArticlesWrapper {
        articles: articles.into_iter().map(ArticleResponse::new).collect(),
        articles_count,
    }))
}

pub async fn feed_articles(
    auth: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Query(params): Query<FeedQueryParams>,
) -> JsonResult<MultipleArticlesWrapper> {
    let (articles, articles_count) =
        list_feed_articles_in_db(&pool, auth.id, params.limit, params.offset).await?;
    Ok(Json(MultipleArticlesWrapper {
        articles: articles.into_iter().map(ArticleResponse::new).collect(),
        articles_count,
    }))
}

pub async fn get_article(
    Extension(pool): Extension<Arc<SqlitePool>>,
    maybe_user: MaybeUser,
    Path(slug): Path<String>,
) -> JsonResult<ArticleJson> {
    let article = get_article_by_slug_in_db(&pool, &slug, maybe_user.get_id())
        .await?
        .ok_or(RequestError::NotFound("Article not found"))?;
    Ok(Json(ArticleWrapper {
        article: ArticleResponse::new(article),
    }))
}

pub async fn create_article(
    auth: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(ArticleWrapper { article }): Json<ArticleWrapper<CreateArticleRequest>>,
) -> JsonResult<ArticleJson> {
    if article.title.trim().is_empty() {
        return Err(RequestError::Validation("title", "can't be blank"));
    }
    let article = create_article_in_db(&pool, auth.id, article).await?;
    Ok(Json(ArticleWrapper {
        article: ArticleResponse::new(article),
    }))
}

pub async fn update_article(
    auth: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(slug): Path<String>,
    Json(ArticleWrapper { article }): Json<ArticleWrapper<UpdateArticleRequest>>,
) -> JsonResult<ArticleJson> {
    let article = update_article_in_db(&pool, auth.id, &slug, article).await?;
    Ok(Json(ArticleWrapper {
        article: ArticleResponse::new(article),
    }))
}

pub async fn delete_article(
    auth: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(slug): Path<String>,
) -> Result<StatusCode, RequestError> {
    delete_article_in_db(&pool, auth.id, &slug).await?;
    Ok(StatusCode::OK)
}

pub async fn favorite_article(
    auth: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(slug): Path<String>,
) -> JsonResult<ArticleJson> {
    let article = favourite_article_in_db(&pool, auth.id, &slug).await?;
    Ok(Json(ArticleWrapper {
        article: ArticleResponse::new(article),
    }))
}

pub async fn unfavorite_article(
    auth: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(slug): Path<String>,
) -> JsonResult<ArticleJson> {
    let article = unfavourite_article_in_db(&pool, auth.id, &slug).await?;
    Ok(Json(ArticleWrapper {
        article: ArticleResponse::new(article),
    }))
}
