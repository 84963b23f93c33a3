// src/db/user_repo.rs

use sqlx::types::Json;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::user::{Phone, User, UserRole},
};

// Repository for the 'users' table (the dashboard's customers).
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe_user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(maybe_user)
    }

    // Looks a customer up by phone number. The phones column is a JSONB
    // array of {number, isZalo}; the first user with a matching number wins.
    pub async fn find_by_phone<'e, E>(
        &self,
        executor: E,
        number: &str,
    ) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe_user = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE deleted_at IS NULL
              AND EXISTS (
                  SELECT 1 FROM jsonb_array_elements(phones) AS p
                  WHERE p->>'number' = $1
              )
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(number)
        .fetch_optional(executor)
        .await?;

        Ok(maybe_user)
    }

    // Creates a customer with a single phone on file.
    pub async fn create_customer<'e, E>(
        &self,
        executor: E,
        name: &str,
        phone: &str,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let phones = Json(vec![Phone {
            number: phone.to_string(),
            is_zalo: false,
        }]);

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, role, phones)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(UserRole::Client)
        .bind(phones)
        .fetch_one(executor)
        .await?;

        Ok(user)
    }

    pub async fn list_all<'e, E>(&self, executor: E) -> Result<Vec<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE deleted_at IS NULL ORDER BY created_at DESC",
        )
        .fetch_all(executor)
        .await?;

        Ok(users)
    }
}
