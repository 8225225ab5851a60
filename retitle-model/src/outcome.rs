use std::fmt::{self, Display};
use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum RenameStatus {
    Renamed,
    AlreadyCorrect,
    SkippedExists,
    SkippedUserDeclined,
    Failed,
}

impl Display for RenameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenameStatus::Renamed => write!(f, "RENAMED"),
            RenameStatus::AlreadyCorrect => write!(f, "ALREADY_CORRECT"),
            RenameStatus::SkippedExists => write!(f, "SKIPPED_EXISTS"),
            RenameStatus::SkippedUserDeclined => {
                write!(f, "SKIPPED_USER_DECLINED")
            }
            RenameStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// Result of one rename attempt; audit entries are built from these.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenameOutcome {
    pub old_path: PathBuf,
    pub new_path: PathBuf,
    pub status: RenameStatus,
    pub timestamp: DateTime<Utc>,
    /// Human-readable cause for skipped and failed outcomes.
    pub detail: Option<String>,
}

impl RenameOutcome {
    pub fn new(
        old_path: impl Into<PathBuf>,
        new_path: impl Into<PathBuf>,
        status: RenameStatus,
    ) -> Self {
        Self {
            old_path: old_path.into(),
            new_path: new_path.into(),
            status,
            timestamp: Utc::now(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Whether this outcome belongs in the audit log.
    pub fn is_auditable(&self) -> bool {
        matches!(self.status, RenameStatus::Renamed | RenameStatus::Failed)
    }

    /// Single audit line, without trailing newline.
    pub fn audit_line(&self) -> String {
        let ts = self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true);
        let mut line = format!(
            "[{ts}] {}: {} -> {}",
            self.status,
            self.old_path.display(),
            self.new_path.display()
        );
        if let Some(detail) = &self.detail {
            line.push_str(&format!(" ({detail})"));
        }
        line
    }
}
