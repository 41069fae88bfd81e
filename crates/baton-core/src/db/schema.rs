//! Canonical SQLite schema for the baton store.
//!
//! The layout mirrors the two-source shape of the history:
//! - `tasks` keeps per-task facts (creator, current stage)
//! - `action_log` is the append-only action history
//! - `attachments` holds per-task attachment records with their
//!   `assigned_to` lists stored as JSON
//! - `profiles` is the local identity directory
//! - `store_meta` tracks schema version metadata

/// Migration v1: core tables plus store metadata.
pub const MIGRATION_V1_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS tasks (
    task_id TEXT PRIMARY KEY CHECK (length(trim(task_id)) > 0),
    title TEXT NOT NULL,
    creator TEXT NOT NULL CHECK (length(trim(creator)) > 0),
    current_stage TEXT NOT NULL,
    created_at_us INTEGER NOT NULL,
    updated_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS action_log (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    task_id TEXT NOT NULL REFERENCES tasks(task_id) ON DELETE CASCADE,
    actor TEXT NOT NULL,
    action TEXT NOT NULL CHECK (
        action IN ('task.taken', 'task.assigned', 'task.handover', 'task.send_next')
    ),
    occurred_at_us INTEGER NOT NULL,
    detail_json TEXT NOT NULL DEFAULT '{}'
);

CREATE TABLE IF NOT EXISTS attachments (
    attachment_id INTEGER PRIMARY KEY AUTOINCREMENT,
    task_id TEXT NOT NULL REFERENCES tasks(task_id) ON DELETE CASCADE,
    taken_by TEXT,
    assigned_to_json TEXT NOT NULL DEFAULT '[]',
    created_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS profiles (
    actor_id TEXT PRIMARY KEY CHECK (length(trim(actor_id)) > 0),
    name TEXT NOT NULL,
    email TEXT NOT NULL DEFAULT '',
    role TEXT,
    updated_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS store_meta (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    schema_version INTEGER NOT NULL,
    created_at_us INTEGER NOT NULL DEFAULT 0
);

INSERT OR IGNORE INTO store_meta (id, schema_version, created_at_us)
VALUES (1, 1, 0);
"#;

/// Migration v2: read-path indexes for the resolution queries.
pub const MIGRATION_V2_SQL: &str = r#"
CREATE INDEX IF NOT EXISTS idx_action_log_task_action_occurred
    ON action_log(task_id, action, occurred_at_us DESC);

CREATE INDEX IF NOT EXISTS idx_attachments_task_created
    ON attachments(task_id, created_at_us DESC);

UPDATE store_meta
SET schema_version = 2
WHERE id = 1;
"#;

/// Indexes expected by the resolution read paths.
pub const REQUIRED_INDEXES: &[&str] = &[
    "idx_action_log_task_action_occurred",
    "idx_attachments_task_created",
];

#[cfg(test)]
mod tests {
    use crate::db::migrations;
    use rusqlite::{Connection, params};

    fn seeded_conn() -> rusqlite::Result<Connection> {
        let mut conn = Connection::open_in_memory()?;
        migrations::migrate(&mut conn)?;

        conn.execute(
            "INSERT INTO tasks (task_id, title, creator, current_stage, created_at_us, updated_at_us)
             VALUES ('t-1', 'Fix login flow', 'creator-1', 'review', 1, 1)",
            [],
        )?;

        for (actor, action, ts) in [
            ("u-1", "task.taken", 10_i64),
            ("u-2", "task.assigned", 20),
            ("u-3", "task.handover", 30),
        ] {
            conn.execute(
                "INSERT INTO action_log (task_id, actor, action, occurred_at_us, detail_json)
                 VALUES ('t-1', ?1, ?2, ?3, '{}')",
                params![actor, action, ts],
            )?;
        }

        conn.execute(
            "INSERT INTO attachments (task_id, taken_by, assigned_to_json, created_at_us)
             VALUES ('t-1', 'u-2', '[]', 40)",
            [],
        )?;

        Ok(conn)
    }

    fn query_plan_details(conn: &Connection, sql: &str) -> rusqlite::Result<Vec<String>> {
        let mut stmt = conn.prepare(&format!("EXPLAIN QUERY PLAN {sql}"))?;
        stmt.query_map([], |row| row.get::<_, String>(3))?
            .collect::<Result<Vec<_>, _>>()
    }

    #[test]
    fn query_plan_uses_action_log_index() -> rusqlite::Result<()> {
        let conn = seeded_conn()?;
        let details = query_plan_details(
            &conn,
            "SELECT actor
             FROM action_log
             WHERE task_id = 't-1' AND action IN ('task.taken', 'task.assigned')
             ORDER BY occurred_at_us DESC",
        )?;

        assert!(
            details
                .iter()
                .any(|detail| detail.contains("idx_action_log_task_action_occurred")),
            "expected action log index in plan, got: {details:?}"
        );

        Ok(())
    }

    #[test]
    fn query_plan_uses_attachments_index() -> rusqlite::Result<()> {
        let conn = seeded_conn()?;
        let details = query_plan_details(
            &conn,
            "SELECT taken_by
             FROM attachments
             WHERE task_id = 't-1'
             ORDER BY created_at_us DESC",
        )?;

        assert!(
            details
                .iter()
                .any(|detail| detail.contains("idx_attachments_task_created")),
            "expected attachments index in plan, got: {details:?}"
        );

        Ok(())
    }

    #[test]
    fn action_check_constraint_rejects_unknown_action() -> rusqlite::Result<()> {
        let conn = seeded_conn()?;
        let result = conn.execute(
            "INSERT INTO action_log (task_id, actor, action, occurred_at_us)
             VALUES ('t-1', 'u-1', 'task.unknown', 99)",
            [],
        );
        assert!(result.is_err(), "unknown action string must be rejected");
        Ok(())
    }

    #[test]
    fn deleting_a_task_cascades_to_history() -> rusqlite::Result<()> {
        let conn = seeded_conn()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.execute("DELETE FROM tasks WHERE task_id = 't-1'", [])?;

        let actions: i64 = conn.query_row("SELECT COUNT(*) FROM action_log", [], |row| row.get(0))?;
        let attachments: i64 =
            conn.query_row("SELECT COUNT(*) FROM attachments", [], |row| row.get(0))?;
        assert_eq!(actions, 0);
        assert_eq!(attachments, 0);
        Ok(())
    }
}
