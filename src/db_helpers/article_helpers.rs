use std::collections::HashSet;

use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::data_formats::{ArticleQueryParams, CreateArticleRequest, UpdateArticleRequest};
use crate::errors::RequestError;
use crate::models::Article;
use crate::slug::slugify;

use super::{get_article_id_by_slug, QueryBuilder};

// Viewer-relative projection: `favorited`/`following` are computed against $1
// and come back false when it is NULL. `favorites_count` is derived from the
// favourite edges so it cannot drift from them.
const SINGLE_ARTICLE_QUERY: &str = r#"
    SELECT articles.id          AS id,
           articles.slug        AS slug,
           articles.title       AS title,
           articles.description AS description,
           articles.body        AS body,
           articles.author_id   AS author_id,
           articles.created_at  AS created_at,
           articles.updated_at  AS updated_at,
           (SELECT group_concat(tags.name, ',')
              FROM tags
              JOIN articletags ON articletags.tag_id = tags.id
             WHERE articletags.article_id = articles.id)  AS tag_list,
           users.username       AS author_username,
           users.bio            AS author_bio,
           users.image          AS author_image,
           (SELECT count(*)
              FROM favourite
             WHERE favourite.article_id = articles.id)    AS favorites_count,
           EXISTS (SELECT 1
                     FROM favourite
                    WHERE favourite.article_id = articles.id
                      AND favourite.user_id = $1)         AS favorited,
           EXISTS (SELECT 1
                     FROM follows
                    WHERE follows.followed_id = articles.author_id
                      AND follows.follower_id = $1)       AS following
      FROM articles
      JOIN users ON users.id = articles.author_id
     WHERE articles.slug = $2
"#;

const LIST_ARTICLES_QUERY: &str = r#"
    SELECT articles.id          AS id,
           articles.slug        AS slug,
           articles.title       AS title,
           articles.description AS description,
           articles.body        AS body,
           articles.author_id   AS author_id,
           articles.created_at  AS created_at,
           articles.updated_at  AS updated_at,
           (SELECT group_concat(tags.name, ',')
              FROM tags
              JOIN articletags ON articletags.tag_id = tags.id
             WHERE articletags.article_id = articles.id)  AS tag_list,
           users.username       AS author_username,
           users.bio            AS author_bio,
           users.image          AS author_image,
           (SELECT count(*)
              FROM favourite
             WHERE favourite.article_id = articles.id)    AS favorites_count,
           EXISTS (SELECT 1
                     FROM favourite
                    WHERE favourite.article_id = articles.id
                      AND favourite.user_id = $1)         AS favorited,
           EXISTS (SELECT 1
                     FROM follows
                    WHERE follows.followed_id = articles.author_id
                      AND follows.follower_id = $1)       AS following
      FROM articles
      JOIN users ON users.id = articles.author_id
     WHERE (users.username = $2 OR $2 IS NULL)
       AND ($3 IS NULL OR EXISTS (SELECT 1
                                    FROM articletags
                                    JOIN tags ON tags.id = articletags.tag_id
                                   WHERE articletags.article_id = articles.id
                                     AND tags.name = $3))
       AND ($4 IS NULL OR EXISTS (SELECT 1
                                    FROM favourite
                                    JOIN users AS fans ON fans.id = favourite.user_id
                                   WHERE favourite.article_id = articles.id
                                     AND fans.username = $4))
     ORDER BY articles.created_at DESC, articles.id DESC
     LIMIT $5 OFFSET $6
"#;

// Same filter set as LIST_ARTICLES_QUERY; the count must reflect the filters,
// not the page.
const COUNT_ARTICLES_QUERY: &str = r#"
    SELECT count(*)
      FROM articles
      JOIN users ON users.id = articles.author_id
     WHERE (users.username = $1 OR $1 IS NULL)
       AND ($2 IS NULL OR EXISTS (SELECT 1
                                    FROM articletags
                                    JOIN tags ON tags.id = articletags.tag_id
                                   WHERE articletags.article_id = articles.id
                                     AND tags.name = $2))
       AND ($3 IS NULL OR EXISTS (SELECT 1
                                    FROM favourite
                                    JOIN users AS fans ON fans.id = favourite.user_id
                                   WHERE favourite.article_id = articles.id
                                     AND fans.username = $3))
"#;

const FEED_ARTICLES_QUERY: &str = r#"
    SELECT articles.id          AS id,
           articles.slug        AS slug,
           articles.title       AS title,
           articles.description AS description,
           articles.body        AS body,
           articles.author_id   AS author_id,
           articles.created_at  AS created_at,
           articles.updated_at  AS updated_at,
           (SELECT group_concat(tags.name, ',')
              FROM tags
              JOIN articletags ON articletags.tag_id = tags.id
             WHERE articletags.article_id = articles.id)  AS tag_list,
           users.username       AS author_username,
           users.bio            AS author_bio,
           users.image          AS author_image,
           (SELECT count(*)
              FROM favourite
             WHERE favourite.article_id = articles.id)    AS favorites_count,
           EXISTS (SELECT 1
                     FROM favourite
                    WHERE favourite.article_id = articles.id
                      AND favourite.user_id = $1)         AS favorited,
           EXISTS (SELECT 1
                     FROM follows
                    WHERE follows.followed_id = articles.author_id
                      AND follows.follower_id = $1)       AS following
      FROM articles
      JOIN users ON users.id = articles.author_id
     WHERE articles.author_id IN (SELECT followed_id
                                    FROM follows
                                   WHERE follower_id = $1)
     ORDER BY articles.created_at DESC, articles.id DESC
     LIMIT $2 OFFSET $3
"#;

const COUNT_FEED_QUERY: &str = r#"
    SELECT count(*)
      FROM articles
     WHERE articles.author_id IN (SELECT followed_id
                                    FROM follows
                                   WHERE follower_id = $1)
"#;

pub async fn get_article_by_slug_in_db(
    pool: &SqlitePool,
    slug: &str,
    viewer: Option<i64>,
) -> Result<Option<Article>, RequestError> {
    let result = sqlx::query_as::<Sqlite, Article>(SINGLE_ARTICLE_QUERY)
        .bind(viewer)
        .bind(slug)
        .fetch_optional(pool)
        .await?;
    Ok(result)
}

pub async fn list_articles_in_db(
    pool: &SqlitePool,
    viewer: Option<i64>,
    ArticleQueryParams {
        tag,
        author,
        favorited,
        limit,
        offset,
    }: ArticleQueryParams,
) -> Result<(Vec<Article>, i64), RequestError> {
    let articles = sqlx::query_as::<Sqlite, Article>(LIST_ARTICLES_QUERY)
        .bind(viewer)
        .bind(&author)
        .bind(&tag)
        .bind(&favorited)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    let (count,): (i64,) = sqlx::query_as(COUNT_ARTICLES_QUERY)
        .bind(&author)
        .bind(&tag)
        .bind(&favorited)
        .fetch_one(pool)
        .await?;

    Ok((articles, count))
}

pub async fn list_feed_articles_in_db(
    pool: &SqlitePool,
    viewer: i64,
    limit: i64,
    offset: i64,
) -> Result<(Vec<Article>, i64), RequestError> {
    // A user following nobody gets an empty feed without touching articles.
    let follows_anyone: Option<(i64,)> =
        sqlx::query_as("SELECT 1 FROM follows WHERE follower_id = $1 LIMIT 1")
            .bind(viewer)
            .fetch_optional(pool)
            .await?;
    if follows_anyone.is_none() {
        return Ok((vec![], 0));
    }

    let articles = sqlx::query_as::<Sqlite, Article>(FEED_ARTICLES_QUERY)
        .bind(viewer)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    let (count,): (i64,) = sqlx::query_as(COUNT_FEED_QUERY)
        .bind(viewer)
        .fetch_one(pool)
        .await?;

    Ok((articles, count))
}

/// Find-or-create every distinct tag name and attach it to the article. Runs
/// inside the caller's transaction so a failure leaves no partial links.
async fn link_tags(
    tx: &mut Transaction<'_, Sqlite>,
    article_id: i64,
    tags: &[String],
) -> Result<(), RequestError> {
    let mut seen = HashSet::new();
    for tag in tags {
        if !seen.insert(tag.as_str()) {
            continue;
        }
        // Upsert so a concurrent insert of the same name still hands back the id
        let (tag_id,): (i64,) = sqlx::query_as(
            "INSERT INTO tags (name) VALUES ($1)
             ON CONFLICT (name) DO UPDATE SET name = $1
             RETURNING id",
        )
        .bind(tag)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO articletags (article_id, tag_id) VALUES ($1, $2)
             ON CONFLICT (article_id, tag_id) DO NOTHING",
        )
        .bind(article_id)
        .bind(tag_id)
        .execute(&mut *tx)
        .await?;
    }
    Ok(())
}

pub async fn create_article_in_db(
    pool: &SqlitePool,
    author_id: i64,
    CreateArticleRequest {
        title,
        description,
        body,
        tag_list,
    }: CreateArticleRequest,
) -> Result<Article, RequestError> {
    let slug = slugify(&title);
    let mut tx = pool.begin().await?;

    let (article_id,): (i64,) = sqlx::query_as(
        "INSERT INTO articles (slug, title, description, body, author_id)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(&slug)
    .bind(&title)
    .bind(&description)
    .bind(&body)
    .bind(author_id)
    .fetch_one(&mut tx)
    .await?;

    if let Some(tags) = &tag_list {
        link_tags(&mut tx, article_id, tags).await?;
    }
    tx.commit().await?;

    get_article_by_slug_in_db(pool, &slug, Some(author_id))
        .await?
        .ok_or(RequestError::ServerError)
}

pub async fn update_article_in_db(
    pool: &SqlitePool,
    viewer: i64,
    slug: &str,
    UpdateArticleRequest {
        title,
        description,
        body,
        tag_list,
    }: UpdateArticleRequest,
) -> Result<Article, RequestError> {
    let article: Option<(i64, i64)> =
        sqlx::query_as("SELECT id, author_id FROM articles WHERE slug = $1")
            .bind(slug)
            .fetch_optional(pool)
            .await?;
    let (article_id, author_id) = match article {
        Some(record) => record,
        None => return Err(RequestError::NotFound("Article not found")),
    };
    if author_id != viewer {
        return Err(RequestError::NotAuthorized(
            "You are not authorized to update this article",
        ));
    }

    // A new title gets a freshly generated slug
    let new_slug = title.as_ref().map(|title| slugify(title));

    let mut tx = pool.begin().await?;

    let (query, params) = QueryBuilder::new("UPDATE articles SET ", ", ")
        .add_param("title", title)
        .add_param("description", description)
        .add_param("body", body)
        .add_param("slug", new_slug.clone())
        .add_clause("updated_at = CURRENT_TIMESTAMP")
        .build();
    let query = format!("{query} WHERE id = ${}", params.len() + 1);
    let mut query = sqlx::query(&query);
    for param in params {
        query = query.bind(param);
    }
    query.bind(article_id).execute(&mut tx).await?;

    // Supplying tagList replaces the association set wholesale
    if let Some(tags) = &tag_list {
        sqlx::query("DELETE FROM articletags WHERE article_id = $1")
            .bind(article_id)
            .execute(&mut tx)
            .await?;
        link_tags(&mut tx, article_id, tags).await?;
    }
    tx.commit().await?;

    let slug = new_slug.as_deref().unwrap_or(slug);
    get_article_by_slug_in_db(pool, slug, Some(viewer))
        .await?
        .ok_or(RequestError::ServerError)
}

pub async fn delete_article_in_db(
    pool: &SqlitePool,
    viewer: i64,
    slug: &str,
) -> Result<(), RequestError> {
    let article: Option<(i64, i64)> =
        sqlx::query_as("SELECT id, author_id FROM articles WHERE slug = $1")
            .bind(slug)
            .fetch_optional(pool)
            .await?;
    let (article_id, author_id) = match article {
        Some(record) => record,
        None => return Err(RequestError::NotFound("Article not found")),
    };
    if author_id != viewer {
        return Err(RequestError::NotAuthorized(
            "You are not authorized to delete this article",
        ));
    }

    // Join rows and comments cascade
    sqlx::query("DELETE FROM articles WHERE id = $1")
        .bind(article_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn favourite_article_in_db(
    pool: &SqlitePool,
    viewer: i64,
    slug: &str,
) -> Result<Article, RequestError> {
    let article_id = get_article_id_by_slug(pool, slug).await?;

    sqlx::query(
        "INSERT INTO favourite (user_id, article_id) VALUES ($1, $2)
         ON CONFLICT (user_id, article_id) DO NOTHING",
    )
    .bind(viewer)
    .bind(article_id)
    .execute(pool)
    .await?;

    get_article_by_slug_in_db(pool, slug, Some(viewer))
        .await?
        .ok_or(RequestError::NotFound("Article not found"))
}

pub async fn unfavourite_article_in_db(
    pool: &SqlitePool,
    viewer: i64,
    slug: &str,
) -> Result<Article, RequestError> {
    let article_id = get_article_id_by_slug(pool, slug).await?;

    sqlx::query("DELETE FROM favourite WHERE user_id = $1 AND article_id = $2")
        .bind(viewer)
        .bind(article_id)
        .execute(pool)
        .await?;

    get_article_by_slug_in_db(pool, slug, Some(viewer))
        .await?
        .ok_or(RequestError::NotFound("Article not found"))
}
