//! Raw record shapes for the two signal sources.
//!
//! Sources are heterogeneous and loosely shaped; every field that history
//! does not guarantee is optional here, with `#[serde(flatten)]` catch-alls
//! preserving unknown payload fields for forward compatibility.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::types::ActionType;

/// Side-payload carried by an action-log record.
///
/// `to*` fields describe the assignment target of a `task.assigned` record;
/// the generic `name`/`email`/`role` fields describe the acting actor and
/// double as the fallback when the `to*` variant is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionDetail {
    /// Target actor id of a `task.assigned` record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Stage a `task.assigned` record claims to apply to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assign_stage: Option<String>,
    /// Stage a `task.taken` record claims to apply to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    /// Unknown payload fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// One entry of the append-only action log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The acting actor's id.
    pub actor: String,
    pub action: ActionType,
    /// Microseconds since the Unix epoch.
    pub occurred_at_us: i64,
    #[serde(default)]
    pub detail: ActionDetail,
}

/// One entry of an attachment's `assigned_to` list.
///
/// `role` doubles as the entry's stage-match key; the source system has
/// always conflated the two and consumers depend on that behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignedEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_at_us: Option<i64>,
    /// Unknown entry fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A per-task attachment record from the second signal source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taken_by: Option<String>,
    pub assigned_to: Vec<AssignedEntry>,
    /// Microseconds since the Unix epoch.
    pub created_at_us: i64,
}
