use std::fmt;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotInitialized,
    ConfigParseError,
    TaskNotFound,
    UnknownActionType,
    InvalidTimestamp,
    AgentUnresolved,
    StoreOpenFailed,
    RecordWriteFailed,
    ActionLogReadFailed,
    AttachmentReadFailed,
    ProfileLookupFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotInitialized => "E1001",
            Self::ConfigParseError => "E1002",
            Self::TaskNotFound => "E2001",
            Self::UnknownActionType => "E2002",
            Self::InvalidTimestamp => "E2003",
            Self::AgentUnresolved => "E2004",
            Self::StoreOpenFailed => "E3001",
            Self::RecordWriteFailed => "E3002",
            Self::ActionLogReadFailed => "E4001",
            Self::AttachmentReadFailed => "E4002",
            Self::ProfileLookupFailed => "E4003",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotInitialized => "Project not initialized",
            Self::ConfigParseError => "Config file parse error",
            Self::TaskNotFound => "Task not found",
            Self::UnknownActionType => "Unknown action type",
            Self::InvalidTimestamp => "Invalid timestamp",
            Self::AgentUnresolved => "No agent identity configured",
            Self::StoreOpenFailed => "Signal store open failed",
            Self::RecordWriteFailed => "Signal record write failed",
            Self::ActionLogReadFailed => "Action log read failed",
            Self::AttachmentReadFailed => "Attachment table read failed",
            Self::ProfileLookupFailed => "Profile directory lookup failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run `bt init` to initialize this directory."),
            Self::ConfigParseError => Some("Fix syntax in .baton/config.toml and retry."),
            Self::TaskNotFound => Some("Register the task with `bt create` first."),
            Self::UnknownActionType => {
                Some("Use one of: task.taken, task.assigned, task.handover, task.send_next.")
            }
            Self::InvalidTimestamp => Some("Pass an RFC 3339 timestamp, e.g. 2026-08-06T12:00:00Z."),
            Self::AgentUnresolved => {
                Some("Set --agent, BATON_AGENT, AGENT, or USER (interactive only).")
            }
            Self::StoreOpenFailed => Some("Check .baton/baton.db permissions and disk space."),
            Self::RecordWriteFailed => Some("Check disk space and write permissions."),
            Self::ActionLogReadFailed => None,
            Self::AttachmentReadFailed => None,
            Self::ProfileLookupFailed => None,
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
