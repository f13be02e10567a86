//! Logging service - structured event logging
//!
//! Keeps a bounded, in-memory log of what happened during the session.
//! No client data (names, tax ids, balances, amounts) is ever logged: only
//! event names, the command that ran and amount-free rejection codes.
//!
//! This service is designed to be used by both the CLI and library callers.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Default number of entries kept before the oldest are dropped
pub const DEFAULT_MAX_ENTRIES: usize = 500;

fn unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

/// Who is driving the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryPoint {
    Cli,
    Library,
}

impl EntryPoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryPoint::Cli => "cli",
            EntryPoint::Library => "library",
        }
    }
}

/// Something worth recording, before the service stamps it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Amount-free reason, such as a rejection code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl LogEvent {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            command: None,
            error_message: None,
        }
    }

    /// Attach the menu command or CLI subcommand that triggered the event
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }
}

/// A recorded log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Position in this session's log, starting at 1
    pub seq: u64,
    pub timestamp: i64,
    pub entry_point: EntryPoint,
    pub app_version: String,
    pub platform: String,
    pub event: String,
    pub command: Option<String>,
    pub error_message: Option<String>,
}

impl LogEntry {
    pub fn is_error(&self) -> bool {
        self.error_message.is_some()
    }
}

/// Counts reported by `LoggingService::stats`
#[derive(Debug, Clone, Serialize)]
pub struct LogStats {
    pub total: usize,
    pub errors: usize,
    pub dropped: u64,
    pub max_entries: usize,
}

#[derive(Default)]
struct Ring {
    entries: VecDeque<LogEntry>,
    next_seq: u64,
    dropped: u64,
}

/// Service for structured event logging
pub struct LoggingService {
    ring: Mutex<Ring>,
    max_entries: usize,
    entry_point: EntryPoint,
    app_version: String,
}

impl LoggingService {
    /// Create a new logging service keeping at most `max_entries` entries
    pub fn new(entry_point: EntryPoint, app_version: impl Into<String>, max_entries: usize) -> Self {
        Self {
            ring: Mutex::new(Ring::default()),
            max_entries: max_entries.max(1),
            entry_point,
            app_version: app_version.into(),
        }
    }

    fn ring(&self) -> Result<MutexGuard<'_, Ring>> {
        self.ring.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))
    }

    /// Record an event, dropping the oldest entry when the log is full
    pub fn log(&self, event: LogEvent) -> Result<()> {
        let mut ring = self.ring()?;

        if ring.entries.len() >= self.max_entries {
            ring.entries.pop_front();
            ring.dropped += 1;
        }
        ring.next_seq += 1;

        let entry = LogEntry {
            seq: ring.next_seq,
            timestamp: unix_millis(),
            entry_point: self.entry_point,
            app_version: self.app_version.clone(),
            platform: std::env::consts::OS.to_string(),
            event: event.event,
            command: event.command,
            error_message: event.error_message,
        };
        ring.entries.push_back(entry);
        Ok(())
    }

    pub fn log_event(&self, event: &str) -> Result<()> {
        self.log(LogEvent::new(event))
    }

    pub fn log_command(&self, command: &str) -> Result<()> {
        self.log(LogEvent::new("command_executed").with_command(command))
    }

    /// Most recent entries first, up to `limit`
    pub fn get_recent(&self, limit: usize) -> Result<Vec<LogEntry>> {
        let ring = self.ring()?;
        Ok(ring.entries.iter().rev().take(limit).cloned().collect())
    }

    /// Most recent entries carrying an error, up to `limit`
    pub fn get_errors(&self, limit: usize) -> Result<Vec<LogEntry>> {
        let ring = self.ring()?;
        Ok(ring
            .entries
            .iter()
            .rev()
            .filter(|e| e.is_error())
            .take(limit)
            .cloned()
            .collect())
    }

    pub fn stats(&self) -> Result<LogStats> {
        let ring = self.ring()?;
        Ok(LogStats {
            total: ring.entries.len(),
            errors: ring.entries.iter().filter(|e| e.is_error()).count(),
            dropped: ring.dropped,
            max_entries: self.max_entries,
        })
    }

    /// Remove every entry, returning how many were removed
    ///
    /// Sequence numbers keep counting from where they were.
    pub fn clear(&self) -> Result<usize> {
        let mut ring = self.ring()?;
        let removed = ring.entries.len();
        ring.entries.clear();
        Ok(removed)
    }
}
