// src/ct_log/registry.rs
use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::log_list::LogListFetcher;
use super::types::CtLog;
use crate::error::VerifyError;

/// Data is considered fresh for three days, matching the log list's own
/// publication cadence.
pub fn default_freshness() -> Duration {
    Duration::days(3)
}

/// TTL-cached directory mapping a base64 log id to that log's metadata.
///
/// One instance is created explicitly and passed to call sites; there is no
/// process-global singleton. The snapshot behind the mutex is only ever
/// replaced wholesale, so readers observe either the previous complete
/// mapping or the new complete mapping, never a partial one. Holding the
/// lock across the refresh also gives single-flight semantics: concurrent
/// callers during initialization or refresh await the one in-flight fetch
/// instead of issuing their own.
pub struct CtLogRegistry {
    fetcher: LogListFetcher,
    freshness: Duration,
    state: Mutex<Option<Snapshot>>,
}

struct Snapshot {
    version: String,
    last_fetched: DateTime<Utc>,
    logs: HashMap<String, CtLog>,
    /// Entries inserted via add_log. Kept apart from the fetched mapping so
    /// a wholesale refresh cannot drop them; they shadow fetched entries
    /// with the same id.
    manual: HashMap<String, CtLog>,
}

impl Snapshot {
    fn is_fresh(&self, freshness: Duration) -> bool {
        Utc::now().signed_duration_since(self.last_fetched) < freshness
    }

    fn lookup(&self, log_id: &str) -> Option<&CtLog> {
        self.manual.get(log_id).or_else(|| self.logs.get(log_id))
    }
}

impl CtLogRegistry {
    pub fn new(fetcher: LogListFetcher, freshness: Duration) -> Self {
        Self {
            fetcher,
            freshness,
            state: Mutex::new(None),
        }
    }

    /// Perform the first-time fetch if it has not happened yet.
    ///
    /// Safe to call concurrently: only one fetch is ever in flight, all
    /// other callers await its outcome.
    pub async fn ensure_initialized(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        self.refresh_if_stale(&mut state).await
    }

    /// Look up a log by its base64 log id, refreshing first when the cached
    /// list has gone stale. An unknown id is a normal `None`, not an error.
    pub async fn get_by_id(&self, log_id: &str) -> Result<Option<CtLog>> {
        let mut state = self.state.lock().await;
        self.refresh_if_stale(&mut state).await?;

        // refresh_if_stale always leaves a snapshot behind on success
        let snapshot = state.as_ref().expect("registry snapshot after refresh");
        Ok(snapshot.lookup(log_id).cloned())
    }

    /// Insert or overwrite a log entry.
    ///
    /// Calling before the registry has been initialized is a caller bug.
    /// Overwriting an existing id is allowed and only logged. Manual
    /// entries survive wholesale refreshes.
    pub async fn add_log(&self, log: CtLog) -> std::result::Result<(), VerifyError> {
        let mut state = self.state.lock().await;
        let snapshot = state.as_mut().ok_or(VerifyError::RegistryUninitialized)?;

        if snapshot.lookup(&log.log_id).is_some() {
            warn!("Log with ID {} already exists. Overwriting.", log.log_id);
        }
        snapshot.manual.insert(log.log_id.clone(), log);
        Ok(())
    }

    /// Version string of the currently cached log list
    pub async fn version(&self) -> Option<String> {
        let state = self.state.lock().await;
        state.as_ref().map(|s| s.version.clone())
    }

    /// Number of known logs, fetched and manual combined
    pub async fn log_count(&self) -> usize {
        let state = self.state.lock().await;
        state
            .as_ref()
            .map(|s| {
                let shadowed = s.manual.keys().filter(|id| s.logs.contains_key(*id)).count();
                s.logs.len() + s.manual.len() - shadowed
            })
            .unwrap_or(0)
    }

    async fn refresh_if_stale(&self, state: &mut Option<Snapshot>) -> Result<()> {
        if let Some(snapshot) = state.as_ref() {
            if snapshot.is_fresh(self.freshness) {
                return Ok(());
            }
            debug!("Cached log list is stale, refreshing");
        }

        let log_list = self
            .fetcher
            .fetch()
            .await
            .context("Failed to refresh CT log list")?;

        let mut logs = HashMap::new();
        for operator in &log_list.operators {
            for log in &operator.logs {
                logs.insert(log.log_id.clone(), log.clone());
            }
        }

        let last_fetched = log_list
            .log_list_timestamp
            .parse::<DateTime<Utc>>()
            .unwrap_or_else(|_| Utc::now());

        // Full replacement of the fetched mapping; manual entries carry over
        let manual = state.take().map(|s| s.manual).unwrap_or_default();

        info!(
            "Loaded CT log list version {} with {} logs",
            log_list.version,
            logs.len()
        );

        *state = Some(Snapshot {
            version: log_list.version,
            last_fetched,
            logs,
            manual,
        });

        Ok(())
    }
}
