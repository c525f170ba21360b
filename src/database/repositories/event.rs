use std::collections::HashMap;

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    database::{
        models::{Event, EventRow, NewEvent},
        transaction::DatabaseTransaction,
    },
    validation::TeamName,
};

#[derive(Clone)]
pub struct EventRepository {
    pool: SqlitePool,
}

impl EventRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All events of a team, most recently created first.
    pub async fn find_by_team(&self, team: &TeamName) -> Result<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT
                id,
                team,
                name,
                category,
                created_at,
                updated_at
            FROM
                events
            WHERE
                team = ?
            ORDER BY
                created_at DESC,
                rowid DESC
            "#,
        )
        .bind(team.as_str())
        .fetch_all(&self.pool)
        .await?;

        let occurrences = sqlx::query_as::<_, (Uuid, DateTime<Utc>)>(
            r#"
            SELECT
                o.event_id,
                o.occurred_at
            FROM
                event_occurrences o
                INNER JOIN events e ON e.id = o.event_id
            WHERE
                e.team = ?
            ORDER BY
                o.seq
            "#,
        )
        .bind(team.as_str())
        .fetch_all(&self.pool)
        .await?;

        let mut timestamps: HashMap<Uuid, Vec<DateTime<Utc>>> = HashMap::new();
        for (event_id, occurred_at) in occurrences {
            timestamps.entry(event_id).or_default().push(occurred_at);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let history = timestamps.remove(&row.id).unwrap_or_default();
                Event::from_row(row, history)
            })
            .collect())
    }

    pub async fn find_by_id(&self, team: &TeamName, id: Uuid) -> Result<Option<Event>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT
                id,
                team,
                name,
                category,
                created_at,
                updated_at
            FROM
                events
            WHERE
                id = ?
                AND team = ?
            "#,
        )
        .bind(id)
        .bind(team.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let timestamps = self.timestamps_for(id).await?;
        Ok(Some(Event::from_row(row, timestamps)))
    }

    async fn timestamps_for(&self, event_id: Uuid) -> Result<Vec<DateTime<Utc>>> {
        let timestamps = sqlx::query_scalar::<_, DateTime<Utc>>(
            r#"
            SELECT
                occurred_at
            FROM
                event_occurrences
            WHERE
                event_id = ?
            ORDER BY
                seq
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(timestamps)
    }

    /// Distinct non-null categories used by a team's events.
    pub async fn find_categories(&self, team: &TeamName) -> Result<Vec<String>> {
        let categories = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT
                category
            FROM
                events
            WHERE
                team = ?
                AND category IS NOT NULL
            ORDER BY
                category
            "#,
        )
        .bind(team.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn create(&self, team: &TeamName, input: NewEvent) -> Result<Event> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            INSERT INTO
                events (
                    id,
                    team,
                    name,
                    category,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?)
            RETURNING
                id,
                team,
                name,
                category,
                created_at,
                updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(team.as_str())
        .bind(input.name)
        .bind(input.category)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(Event::from_row(row, Vec::new()))
    }

    /// Records one occurrence at `at` and moves `updated_at` to the same instant.
    /// Returns `None` when the event does not exist under `team`.
    pub async fn append_occurrence(
        &self,
        team: &TeamName,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<Event>> {
        let team_name = team.as_str().to_string();

        let touched = DatabaseTransaction::run(&self.pool, move |tx| {
            Box::pin(async move {
                let result = sqlx::query(
                    r#"
                    UPDATE
                        events
                    SET
                        updated_at = ?
                    WHERE
                        id = ?
                        AND team = ?
                    "#,
                )
                .bind(at)
                .bind(id)
                .bind(&team_name)
                .execute(&mut **tx)
                .await?;

                if result.rows_affected() == 0 {
                    return Ok(false);
                }

                sqlx::query(
                    r#"
                    INSERT INTO
                        event_occurrences (event_id, occurred_at)
                    VALUES
                        (?, ?)
                    "#,
                )
                .bind(id)
                .bind(at)
                .execute(&mut **tx)
                .await?;

                Ok::<_, anyhow::Error>(true)
            })
        })
        .await?;

        if !touched {
            return Ok(None);
        }

        self.find_by_id(team, id).await
    }

    /// Removes the event and its whole history. Returns `false` if nothing matched.
    pub async fn delete(&self, team: &TeamName, id: Uuid) -> Result<bool> {
        let team_name = team.as_str().to_string();

        DatabaseTransaction::run(&self.pool, move |tx| {
            Box::pin(async move {
                let result = sqlx::query("DELETE FROM events WHERE id = ? AND team = ?")
                    .bind(id)
                    .bind(&team_name)
                    .execute(&mut **tx)
                    .await?;

                if result.rows_affected() == 0 {
                    return Ok(false);
                }

                sqlx::query("DELETE FROM event_occurrences WHERE event_id = ?")
                    .bind(id)
                    .execute(&mut **tx)
                    .await?;

                Ok::<_, anyhow::Error>(true)
            })
        })
        .await
    }
}
