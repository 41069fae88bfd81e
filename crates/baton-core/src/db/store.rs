//! The SQLite-backed implementation of all four signal seams.

use anyhow::{Context, Result, bail};
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use std::path::Path;
use tracing::warn;

use crate::model::actor::ActorId;
use crate::signal::record::{ActionDetail, ActionRecord, AssignedEntry, AttachmentRecord};
use crate::signal::types::ActionType;
use crate::source::{ActionLog, AttachmentStore, Profile, ProfileDirectory, TaskDirectory};

/// A baton store backed by a single SQLite connection.
///
/// Reads tolerate per-row damage: a malformed detail or `assigned_to`
/// payload degrades that row and logs a warning instead of failing the
/// whole query.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the store at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if opening or migrating the database fails.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = super::open_store(path)?;
        Ok(Self { conn })
    }

    /// An in-memory store at the latest schema, for tests and benches.
    ///
    /// # Errors
    ///
    /// Returns an error if migration fails.
    pub fn in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory().context("open in-memory database")?;
        conn.pragma_update(None, "foreign_keys", "ON")
            .context("enable foreign keys")?;
        super::migrations::migrate(&mut conn).context("apply store migrations")?;
        Ok(Self { conn })
    }

    /// Create a task.
    ///
    /// # Errors
    ///
    /// Returns an error if the task already exists or the write fails.
    pub fn create_task(
        &self,
        task_id: &str,
        title: &str,
        creator: &str,
        stage: &str,
        at_us: i64,
    ) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO tasks (task_id, title, creator, current_stage, created_at_us, updated_at_us)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                params![task_id, title, creator, stage, at_us],
            )
            .with_context(|| format!("create task '{task_id}'"))?;
        Ok(())
    }

    /// Returns `true` if a task with `task_id` exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn task_exists(&self, task_id: &str) -> Result<bool> {
        let exists: bool = self
            .conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM tasks WHERE task_id = ?1)",
                params![task_id],
                |row| row.get(0),
            )
            .with_context(|| format!("check task '{task_id}'"))?;
        Ok(exists)
    }

    /// Move a task to a new stage.
    ///
    /// # Errors
    ///
    /// Returns an error if the task does not exist or the write fails.
    pub fn set_stage(&self, task_id: &str, stage: &str, at_us: i64) -> Result<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE tasks SET current_stage = ?2, updated_at_us = ?3 WHERE task_id = ?1",
                params![task_id, stage, at_us],
            )
            .with_context(|| format!("set stage for task '{task_id}'"))?;
        if changed == 0 {
            bail!("task '{task_id}' not found");
        }
        Ok(())
    }

    /// Append one record to the action log.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn append_action(&self, task_id: &str, record: &ActionRecord) -> Result<()> {
        let detail_json =
            serde_json::to_string(&record.detail).context("serialize action detail")?;
        self.conn
            .execute(
                "INSERT INTO action_log (task_id, actor, action, occurred_at_us, detail_json)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    task_id,
                    record.actor,
                    record.action.as_str(),
                    record.occurred_at_us,
                    detail_json
                ],
            )
            .with_context(|| format!("append {} for task '{task_id}'", record.action))?;
        Ok(())
    }

    /// Add one attachment record.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn add_attachment(&self, task_id: &str, record: &AttachmentRecord) -> Result<()> {
        let assigned_to_json =
            serde_json::to_string(&record.assigned_to).context("serialize assigned_to list")?;
        self.conn
            .execute(
                "INSERT INTO attachments (task_id, taken_by, assigned_to_json, created_at_us)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    task_id,
                    record.taken_by,
                    assigned_to_json,
                    record.created_at_us
                ],
            )
            .with_context(|| format!("add attachment for task '{task_id}'"))?;
        Ok(())
    }

    /// Insert or update a directory profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn upsert_profile(&self, actor_id: &str, profile: &Profile, at_us: i64) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO profiles (actor_id, name, email, role, updated_at_us)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(actor_id) DO UPDATE SET
                     name = excluded.name,
                     email = excluded.email,
                     role = excluded.role,
                     updated_at_us = excluded.updated_at_us",
                params![actor_id, profile.name, profile.email, profile.role, at_us],
            )
            .with_context(|| format!("upsert profile '{actor_id}'"))?;
        Ok(())
    }

    fn task_column(&self, task_id: &str, column: &str) -> Result<String> {
        let sql = format!("SELECT {column} FROM tasks WHERE task_id = ?1");
        let value: Option<String> = self
            .conn
            .query_row(&sql, params![task_id], |row| row.get(0))
            .optional()
            .with_context(|| format!("read {column} for task '{task_id}'"))?;
        match value {
            Some(value) => Ok(value),
            None => bail!("task '{task_id}' not found"),
        }
    }
}

impl TaskDirectory for SqliteStore {
    fn creator(&self, task_id: &str) -> Result<ActorId> {
        Ok(ActorId::new(self.task_column(task_id, "creator")?))
    }

    fn current_stage(&self, task_id: &str) -> Result<String> {
        self.task_column(task_id, "current_stage")
    }
}

impl ActionLog for SqliteStore {
    fn records(&self, task_id: &str, kinds: &[ActionType]) -> Result<Vec<ActionRecord>> {
        if kinds.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = (2..=kinds.len() + 1)
            .map(|n| format!("?{n}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT actor, action, occurred_at_us, detail_json
             FROM action_log
             WHERE task_id = ?1 AND action IN ({placeholders})
             ORDER BY occurred_at_us DESC, seq DESC"
        );

        let mut stmt = self
            .conn
            .prepare(&sql)
            .context("prepare action log query")?;
        let mut bindings: Vec<String> = vec![task_id.to_string()];
        bindings.extend(kinds.iter().map(|k| k.as_str().to_string()));

        let rows = stmt
            .query_map(params_from_iter(bindings), |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .with_context(|| format!("query action log for task '{task_id}'"))?;

        let mut records = Vec::new();
        for row in rows {
            let (actor, action, occurred_at_us, detail_json) =
                row.context("read action log row")?;
            let Ok(action) = action.parse::<ActionType>() else {
                warn!(%task_id, %action, "skipping action log row with unknown action");
                continue;
            };
            let detail: ActionDetail = match serde_json::from_str(&detail_json) {
                Ok(detail) => detail,
                Err(error) => {
                    warn!(%task_id, %error, "malformed action detail, using empty detail");
                    ActionDetail::default()
                }
            };
            records.push(ActionRecord {
                actor,
                action,
                occurred_at_us,
                detail,
            });
        }
        Ok(records)
    }
}

impl AttachmentStore for SqliteStore {
    fn attachments(&self, task_id: &str) -> Result<Vec<AttachmentRecord>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT taken_by, assigned_to_json, created_at_us
                 FROM attachments
                 WHERE task_id = ?1
                 ORDER BY created_at_us DESC",
            )
            .context("prepare attachments query")?;

        let rows = stmt
            .query_map(params![task_id], |row| {
                Ok((
                    row.get::<_, Option<String>>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            })
            .with_context(|| format!("query attachments for task '{task_id}'"))?;

        let mut records = Vec::new();
        for row in rows {
            let (taken_by, assigned_to_json, created_at_us) =
                row.context("read attachment row")?;
            let assigned_to: Vec<AssignedEntry> = match serde_json::from_str(&assigned_to_json) {
                Ok(entries) => entries,
                Err(error) => {
                    warn!(%task_id, %error, "malformed assigned_to list, using empty list");
                    Vec::new()
                }
            };
            records.push(AttachmentRecord {
                taken_by,
                assigned_to,
                created_at_us,
            });
        }
        Ok(records)
    }
}

impl ProfileDirectory for SqliteStore {
    fn resolve(&self, actor_id: &ActorId) -> Result<Option<Profile>> {
        self.conn
            .query_row(
                "SELECT name, email, role FROM profiles WHERE actor_id = ?1",
                params![actor_id.as_str()],
                |row| {
                    Ok(Profile {
                        name: row.get(0)?,
                        email: row.get(1)?,
                        role: row.get(2)?,
                    })
                },
            )
            .optional()
            .with_context(|| format!("look up profile '{actor_id}'"))
    }
}
