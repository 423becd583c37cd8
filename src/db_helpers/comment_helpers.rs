use sqlx::{Sqlite, SqlitePool};

use crate::{errors::RequestError, models::Comment};

use super::get_article_id_by_slug;

const COMMENT_QUERY: &str = r#"
    SELECT comments.id         AS id,
           comments.body       AS body,
           comments.author_id  AS author_id,
           comments.created_at AS created_at,
           comments.updated_at AS updated_at,
           users.username      AS author_username,
           users.bio           AS author_bio,
           users.image         AS author_image,
           EXISTS (SELECT 1
                     FROM follows
                    WHERE follows.followed_id = comments.author_id
                      AND follows.follower_id = $1) AS following
      FROM comments
      JOIN users ON users.id = comments.author_id
     WHERE comments.article_id = $2
     ORDER BY comments.created_at DESC, comments.id DESC
"#;

const SINGLE_COMMENT_QUERY: &str = r#"
    SELECT comments.id         AS id,
           comments.body       AS body,
           comments.author_id  AS author_id,
           comments.created_at AS created_at,
           comments.updated_at AS updated_at,
           users.username      AS author_username,
           users.bio           AS author_bio,
           users.image         AS author_image,
           EXISTS (SELECT 1
                     FROM follows
                    WHERE follows.followed_id = comments.author_id
                      AND follows.follower_id = $1) AS following
      FROM comments
      JOIN users ON users.id = comments.author_id
     WHERE comments.id = $2
"#;

pub async fn add_comment_to_article_in_db(
    pool: &SqlitePool,
    author_id: i64,
    slug: &str,
    body: &str,
) -> Result<Comment, RequestError> {
    let article_id = get_article_id_by_slug(pool, slug).await?;

    let (comment_id,): (i64,) = sqlx::query_as(
        "INSERT INTO comments (body, author_id, article_id)
         VALUES ($1, $2, $3)
         RETURNING id",
    )
    .bind(body)
    .bind(author_id)
    .bind(article_id)
    .fetch_one(pool)
    .await?;

    let comment = sqlx::query_as::<Sqlite, Comment>(SINGLE_COMMENT_QUERY)
        .bind(author_id)
        .bind(comment_id)
        .fetch_one(pool)
        .await?;
    Ok(comment)
}

pub async fn get_comments_for_article_in_db(
    pool: &SqlitePool,
    viewer: Option<i64>,
    slug: &str,
) -> Result<Vec<Comment>, RequestError> {
    let article_id = get_article_id_by_slug(pool, slug).await?;

    let comments = sqlx::query_as::<Sqlite, Comment>(COMMENT_QUERY)
        .bind(viewer)
        .bind(article_id)
        .fetch_all(pool)
        .await?;
    Ok(comments)
}

pub async fn delete_comment_in_db(
    pool: &SqlitePool,
    viewer: i64,
    slug: &str,
    comment_id: i64,
) -> Result<(), RequestError> {
    let article_id = get_article_id_by_slug(pool, slug).await?;

    let comment: Option<(i64,)> =
        sqlx::query_as("SELECT author_id FROM comments WHERE id = $1 AND article_id = $2")
            .bind(comment_id)
            .bind(article_id)
            .fetch_optional(pool)
            .await?;
    let (author_id,) = match comment {
        Some(record) => record,
        None => return Err(RequestError::NotFound("Comment not found")),
    };
    if author_id != viewer {
        return Err(RequestError::NotAuthorized(
            "You are not authorized to delete this comment",
        ));
    }

    sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(comment_id)
        .execute(pool)
        .await?;
    Ok(())
}
