use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};
use uuid::Uuid;

use crate::models::outreach_model::{
    ListKind, ListStatus, OutreachEntry, OutreachList, ReconcileSummary,
};

/// Guarda las listas generadas entre la generación y la grabación en la planilla.
#[derive(Clone, Debug)]
pub struct ListStoreService {
    db_pool: Pool<Sqlite>,
}

impl ListStoreService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        ListStoreService { db_pool }
    }

    /// Corre migraciones con sqlx
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.db_pool).await?;
        Ok(())
    }

    /// Crea la lista en estado "generated".
    pub async fn create_list(
        &self,
        kind: ListKind,
        generated_on: NaiveDate,
        entries: Vec<OutreachEntry>,
    ) -> Result<OutreachList> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let entries_json = serde_json::to_string(&entries)?;

        sqlx::query(
            r#"
            INSERT INTO outreach_lists (
                id, kind, status, generated_on, entries, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            "#,
        )
        .bind(&id)
        .bind(kind.as_str())
        .bind(ListStatus::Generated.as_str())
        .bind(generated_on.format("%Y-%m-%d").to_string())
        .bind(entries_json)
        .bind(now.to_rfc3339())
        .execute(&self.db_pool)
        .await
        .context("Fallo al insertar outreach_list")?;

        Ok(OutreachList {
            id,
            kind,
            status: ListStatus::Generated,
            generated_on,
            created_at: now,
            updated_at: now,
            entries,
        })
    }

    pub async fn get_list(&self, id: &str) -> Result<Option<OutreachList>> {
        let row = sqlx::query(
            r#"
            SELECT id, kind, status, generated_on, entries, created_at, updated_at
            FROM outreach_lists
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await
        .context("Fallo al consultar outreach_list")?;

        row.map(|r| list_from_row(&r)).transpose()
    }

    /// Reemplaza las entradas (marcas de enviado). Sólo listas en "generated".
    /// Devuelve false si la lista no existe o ya fue grabada.
    pub async fn update_entries(&self, id: &str, entries: &[OutreachEntry]) -> Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE outreach_lists
            SET entries = ?2,
                updated_at = ?3
            WHERE id = ?1 AND status = ?4
            "#,
        )
        .bind(id)
        .bind(serde_json::to_string(entries)?)
        .bind(Utc::now().to_rfc3339())
        .bind(ListStatus::Generated.as_str())
        .execute(&self.db_pool)
        .await
        .context("Fallo al actualizar marcas")?;
        Ok(res.rows_affected() == 1)
    }

    /// generated -> reconciled. Devuelve false si ya estaba grabada.
    pub async fn mark_reconciled(&self, id: &str, summary: &ReconcileSummary) -> Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE outreach_lists
            SET status = ?2,
                updated_count = ?3,
                logged_count = ?4,
                updated_at = ?5
            WHERE id = ?1 AND status = ?6
            "#,
        )
        .bind(id)
        .bind(ListStatus::Reconciled.as_str())
        .bind(summary.updated_count as i64)
        .bind(summary.logged_count as i64)
        .bind(Utc::now().to_rfc3339())
        .bind(ListStatus::Generated.as_str())
        .execute(&self.db_pool)
        .await
        .context("Fallo al marcar lista como grabada")?;
        Ok(res.rows_affected() == 1)
    }
}

fn list_from_row(row: &SqliteRow) -> Result<OutreachList> {
    let kind: String = row.try_get("kind")?;
    let status: String = row.try_get("status")?;
    let generated_on: String = row.try_get("generated_on")?;
    let entries: String = row.try_get("entries")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(OutreachList {
        id: row.try_get("id")?,
        kind: ListKind::parse(&kind).ok_or_else(|| anyhow!("kind desconocido: {}", kind))?,
        status: ListStatus::parse(&status).ok_or_else(|| anyhow!("status desconocido: {}", status))?,
        generated_on: NaiveDate::parse_from_str(&generated_on, "%Y-%m-%d")?,
        created_at: created_at.parse()?,
        updated_at: updated_at.parse()?,
        entries: serde_json::from_str(&entries).context("entries JSON inválido")?,
    })
}
