use sqlx::{Sqlite, SqlitePool};

use crate::{errors::RequestError, models::User};

mod article_helpers;
mod comment_helpers;
mod profile_helpers;
mod tag_helpers;
mod user_helpers;

pub use article_helpers::*;
pub use comment_helpers::*;
pub use profile_helpers::*;
pub use tag_helpers::*;
pub use user_helpers::*;

/// Builds partial `UPDATE ... SET` statements out of the optional fields of an
/// update request, numbering the placeholders as they are added.
struct QueryBuilder {
    query: String,
    params: Vec<String>,
    seperator: &'static str,
}

impl QueryBuilder {
    fn new(initial: &str, seperator: &'static str) -> Self {
        Self {
            query: initial.to_owned(),
            params: vec![],
            seperator,
        }
    }

    fn add_param(mut self, column: &str, param: Option<String>) -> Self {
        if let Some(value) = param {
            self.params.push(value);
            self.query
                .push_str(&format!("{} = ${}", column, self.params.len()));
            self.query.push_str(self.seperator);
        }
        self
    }

    fn add_clause(mut self, clause: &str) -> Self {
        self.query.push_str(clause);
        self.query.push_str(self.seperator);
        self
    }

    fn build(mut self) -> (String, Vec<String>) {
        self.query = self.query.trim_end_matches(self.seperator).to_string();
        (self.query, self.params)
    }
}

// ----------------- Shared Lookups -----------------

const USER_COLUMNS: &str = "id, username, email, password, bio, image, created_at";

pub(crate) async fn get_user_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, RequestError> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
    let result = sqlx::query_as::<Sqlite, User>(&query)
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(result)
}

pub(crate) async fn get_user_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<User>, RequestError> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
    let result = sqlx::query_as::<Sqlite, User>(&query)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(result)
}

pub async fn get_user_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, RequestError> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    let result = sqlx::query_as::<Sqlite, User>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(result)
}

pub(crate) async fn get_article_id_by_slug(
    pool: &SqlitePool,
    slug: &str,
) -> Result<i64, RequestError> {
    let article: Option<(i64,)> = sqlx::query_as("SELECT id FROM articles WHERE slug = $1")
        .bind(slug)
        .fetch_optional(pool)
        .await?;
    match article {
        Some((id,)) => Ok(id),
        None => Err(RequestError::NotFound("Article not found")),
    }
}

#[cfg(test)]
mod tests {
    use super::QueryBuilder;

    #[test]
    fn skips_absent_fields_and_numbers_params() {
        let (query, params) = QueryBuilder::new("UPDATE users SET ", ", ")
            .add_param("email", Some("a@b.c".to_string()))
            .add_param("bio", None)
            .add_param("username", Some("ann".to_string()))
            .build();
        assert_eq!(query, "UPDATE users SET email = $1, username = $2");
        assert_eq!(params, vec!["a@b.c".to_string(), "ann".to_string()]);
    }

    #[test]
    fn raw_clause_takes_no_param() {
        let (query, params) = QueryBuilder::new("UPDATE articles SET ", ", ")
            .add_param("title", Some("New".to_string()))
            .add_clause("updated_at = CURRENT_TIMESTAMP")
            .build();
        assert_eq!(
            query,
            "UPDATE articles SET title = $1, updated_at = CURRENT_TIMESTAMP"
        );
        assert_eq!(params.len(), 1);
    }
}
