use sqlx::SqlitePool;

use crate::errors::RequestError;

/// Every tag ever used, alphabetical. Tags are never deleted even when the last
/// article referencing them goes away.
pub async fn get_tags_in_db(pool: &SqlitePool) -> Result<Vec<String>, RequestError> {
    let result = sqlx::query_scalar("SELECT name FROM tags ORDER BY name ASC")
        .fetch_all(pool)
        .await?;
    Ok(result)
}
