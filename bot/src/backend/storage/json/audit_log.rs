use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use uuid::Uuid;

/// Audited action kinds. Only balance-moving operations performed on behalf
/// of another user are recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    SetBalance,
    Transfer,
}

/// One structured audit line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub actor_id: String,
    pub actor_name: String,
    pub action: AuditAction,
    pub amount: i64,
    pub target_id: String,
    pub target_name: String,
    pub timestamp: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(
        actor_id: impl Into<String>,
        actor_name: impl Into<String>,
        action: AuditAction,
        amount: i64,
        target_id: impl Into<String>,
        target_name: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            actor_id: actor_id.into(),
            actor_name: actor_name.into(),
            action,
            amount,
            target_id: target_id.into(),
            target_name: target_name.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Append-only audit sink writing one JSON object per line.
///
/// Best effort by design: the mutation an entry describes is already
/// committed by the time the entry is written, so callers log append
/// failures instead of failing the operation.
#[derive(Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn append(&self, entry: &AuditEntry) -> Result<()> {
        let line = serde_json::to_string(entry)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open audit log: {}", self.path.display()))?;
        writeln!(file, "{}", line)
            .with_context(|| format!("Failed to append audit entry: {}", self.path.display()))
    }
}
