use anyhow::Result;
use chrono::Utc;
use sqlx::{SqlitePool, types::Json};
use uuid::Uuid;

use crate::{
    database::{
        models::{Team, TeamConfig, TeamUpsert},
        transaction::DatabaseTransaction,
    },
    validation::TeamName,
};

#[derive(Clone)]
pub struct TeamRepository {
    pool: SqlitePool,
}

impl TeamRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> Result<Vec<Team>> {
        let teams = sqlx::query_as::<_, Team>(
            r#"
            SELECT
                id,
                name,
                display_name,
                description,
                categories,
                created_at
            FROM
                teams
            ORDER BY
                name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(teams)
    }

    pub async fn find_by_name(&self, name: &TeamName) -> Result<Option<Team>> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            SELECT
                id,
                name,
                display_name,
                description,
                categories,
                created_at
            FROM
                teams
            WHERE
                name = ?
            "#,
        )
        .bind(name.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(team)
    }

    /// Creates the team or replaces its configuration. `id` and `created_at`
    /// survive a replace.
    pub async fn upsert(&self, name: &TeamName, config: TeamConfig) -> Result<TeamUpsert> {
        let name = name.as_str().to_string();

        DatabaseTransaction::run(&self.pool, move |tx| {
            Box::pin(async move {
                let existing =
                    sqlx::query_scalar::<_, Uuid>("SELECT id FROM teams WHERE name = ?")
                        .bind(&name)
                        .fetch_optional(&mut **tx)
                        .await?;

                let created = existing.is_none();
                let team = match existing {
                    Some(id) => {
                        sqlx::query_as::<_, Team>(
                            r#"
                            UPDATE
                                teams
                            SET
                                display_name = ?,
                                description = ?,
                                categories = ?
                            WHERE
                                id = ?
                            RETURNING
                                id,
                                name,
                                display_name,
                                description,
                                categories,
                                created_at
                            "#,
                        )
                        .bind(config.display_name)
                        .bind(config.description)
                        .bind(Json(config.categories))
                        .bind(id)
                        .fetch_one(&mut **tx)
                        .await?
                    }
                    None => {
                        sqlx::query_as::<_, Team>(
                            r#"
                            INSERT INTO
                                teams (
                                    id,
                                    name,
                                    display_name,
                                    description,
                                    categories,
                                    created_at
                                )
                            VALUES
                                (?, ?, ?, ?, ?, ?)
                            RETURNING
                                id,
                                name,
                                display_name,
                                description,
                                categories,
                                created_at
                            "#,
                        )
                        .bind(Uuid::new_v4())
                        .bind(&name)
                        .bind(config.display_name)
                        .bind(config.description)
                        .bind(Json(config.categories))
                        .bind(Utc::now())
                        .fetch_one(&mut **tx)
                        .await?
                    }
                };

                Ok::<_, anyhow::Error>(TeamUpsert { team, created })
            })
        })
        .await
    }
}
