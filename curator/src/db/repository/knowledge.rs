use chrono::{DateTime, Utc};
use libsql::{params, Connection};
use nanoid::nanoid;

use crate::error::Result;
use crate::models::{EntrySource, KnowledgeBase, KnowledgeEntry};

pub struct KnowledgeBaseRepository;

impl KnowledgeBaseRepository {
    pub async fn create(conn: &Connection, name: &str, model: &str) -> Result<KnowledgeBase> {
        let now = Utc::now();
        let kb = KnowledgeBase {
            id: nanoid!(),
            name: name.to_string(),
            model: model.to_string(),
            created_at: now,
            updated_at: now,
        };

        conn.execute(
            r#"
            INSERT INTO knowledge_bases (id, name, model, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                kb.id.clone(),
                kb.name.clone(),
                kb.model.clone(),
                kb.created_at.to_rfc3339(),
                kb.updated_at.to_rfc3339(),
            ],
        )
        .await?;

        Ok(kb)
    }

    pub async fn get_by_id(conn: &Connection, id: &str) -> Result<Option<KnowledgeBase>> {
        let mut rows = conn
            .query(
                "SELECT id, name, model, created_at, updated_at FROM knowledge_bases WHERE id = ?1",
                params![id],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(KnowledgeBase {
                id: row.get(0)?,
                name: row.get(1)?,
                model: row.get(2)?,
                created_at: parse_timestamp(&row.get::<String>(3)?),
                updated_at: parse_timestamp(&row.get::<String>(4)?),
            }))
        } else {
            Ok(None)
        }
    }
}

pub struct KnowledgeEntryRepository;

impl KnowledgeEntryRepository {
    pub async fn create(
        conn: &Connection,
        kb_id: &str,
        q: &str,
        a: &str,
        source: EntrySource,
    ) -> Result<KnowledgeEntry> {
        let now = Utc::now();
        let entry = KnowledgeEntry {
            id: nanoid!(),
            kb_id: kb_id.to_string(),
            q: q.to_string(),
            a: a.to_string(),
            source,
            created_at: now,
            updated_at: now,
        };

        conn.execute(
            r#"
            INSERT INTO knowledge_entries (id, kb_id, q, a, source, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                entry.id.clone(),
                entry.kb_id.clone(),
                entry.q.clone(),
                entry.a.clone(),
                entry.source.to_string(),
                entry.created_at.to_rfc3339(),
                entry.updated_at.to_rfc3339(),
            ],
        )
        .await?;

        Ok(entry)
    }

    pub async fn get_by_id(conn: &Connection, id: &str) -> Result<Option<KnowledgeEntry>> {
        let mut rows = conn
            .query(
                "SELECT id, kb_id, q, a, source, created_at, updated_at FROM knowledge_entries WHERE id = ?1",
                params![id],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_entry(&row)?))
        } else {
            Ok(None)
        }
    }

    /// Replace the answer; `q = None` signals "no change" and leaves the
    /// stored question (and whatever index is built on it) untouched.
    pub async fn update(conn: &Connection, id: &str, q: Option<&str>, a: &str) -> Result<bool> {
        let rows_affected = match q {
            Some(q) => {
                conn.execute(
                    "UPDATE knowledge_entries SET q = ?2, a = ?3, updated_at = ?4 WHERE id = ?1",
                    params![id, q, a, Utc::now().to_rfc3339()],
                )
                .await?
            }
            None => {
                conn.execute(
                    "UPDATE knowledge_entries SET a = ?2, updated_at = ?3 WHERE id = ?1",
                    params![id, a, Utc::now().to_rfc3339()],
                )
                .await?
            }
        };

        Ok(rows_affected > 0)
    }

    pub async fn delete(conn: &Connection, id: &str) -> Result<bool> {
        let rows_affected = conn
            .execute("DELETE FROM knowledge_entries WHERE id = ?1", params![id])
            .await?;

        Ok(rows_affected > 0)
    }

    fn row_to_entry(row: &libsql::Row) -> Result<KnowledgeEntry> {
        Ok(KnowledgeEntry {
            id: row.get(0)?,
            kb_id: row.get(1)?,
            q: row.get(2)?,
            a: row.get(3)?,
            source: row
                .get::<String>(4)?
                .parse()
                .unwrap_or(EntrySource::Manual),
            created_at: parse_timestamp(&row.get::<String>(5)?),
            updated_at: parse_timestamp(&row.get::<String>(6)?),
        })
    }
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
