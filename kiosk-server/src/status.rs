//! Queue status feed client
//!
//! Polls the upstream queue endpoint for the currently waiting numbers.
//! Fetch or parse failures surface as explicit errors so callers never see
//! silently stale data.

use crate::error::{KioskError, KioskResult};
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

/// Raw status feed body: `{ "waiting": [int...] | null, "current": int | null }`
#[derive(Debug, Deserialize)]
pub struct QueueStatus {
    #[serde(default)]
    pub waiting: Option<Vec<u32>>,
    #[serde(default)]
    pub current: Option<u32>,
}

/// One observed queue state, normalized from the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueSnapshot {
    /// Numbers currently waiting; empty when the feed reports null
    pub waiting: Vec<u32>,
    /// Now-serving number; derived as min(waiting) when the feed omits it
    pub current: Option<u32>,
}

impl From<QueueStatus> for QueueSnapshot {
    fn from(status: QueueStatus) -> Self {
        let waiting = status.waiting.unwrap_or_default();
        let current = status.current.or_else(|| waiting.iter().min().copied());
        Self { waiting, current }
    }
}

impl QueueSnapshot {
    /// Numbers whose audio artifacts must survive this cycle
    pub fn keep_set(&self) -> HashSet<u32> {
        let mut keep: HashSet<u32> = self.waiting.iter().copied().collect();
        if let Some(current) = self.current {
            keep.insert(current);
        }
        keep
    }

    /// Smallest waiting number, if any
    pub fn min_waiting(&self) -> Option<u32> {
        self.waiting.iter().min().copied()
    }
}

/// Source of queue snapshots; seam for testing the reconciler
#[allow(async_fn_in_trait)]
pub trait StatusSource {
    async fn fetch(&self) -> KioskResult<QueueSnapshot>;
}

/// HTTP status feed client
#[derive(Debug, Clone)]
pub struct StatusClient {
    client: reqwest::Client,
    url: String,
}

impl StatusClient {
    /// Create a client for the given status endpoint, 3s timeout
    pub fn new(url: impl Into<String>) -> KioskResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(3))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl StatusSource for StatusClient {
    async fn fetch(&self) -> KioskResult<QueueSnapshot> {
        let resp = self.client.get(&self.url).send().await?;
        if !resp.status().is_success() {
            return Err(KioskError::StatusFeed(format!(
                "{} returned {}",
                self.url,
                resp.status()
            )));
        }
        let status: QueueStatus = resp.json().await?;
        Ok(status.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_derived_from_min_waiting() {
        let status: QueueStatus = serde_json::from_str(r#"{"waiting":[8,7],"current":null}"#).unwrap();
        let snapshot = QueueSnapshot::from(status);
        assert_eq!(snapshot.current, Some(7));
        assert_eq!(snapshot.waiting, vec![8, 7]);
    }

    #[test]
    fn explicit_current_preserved() {
        let status: QueueStatus = serde_json::from_str(r#"{"waiting":[1],"current":5}"#).unwrap();
        let snapshot = QueueSnapshot::from(status);
        assert_eq!(snapshot.current, Some(5));
    }

    #[test]
    fn null_waiting_is_empty() {
        let status: QueueStatus = serde_json::from_str(r#"{"waiting":null}"#).unwrap();
        let snapshot = QueueSnapshot::from(status);
        assert!(snapshot.waiting.is_empty());
        assert_eq!(snapshot.current, None);
    }

    #[test]
    fn keep_set_includes_current() {
        let snapshot = QueueSnapshot {
            waiting: vec![6, 7],
            current: Some(5),
        };
        let keep = snapshot.keep_set();
        assert_eq!(keep, [5, 6, 7].into_iter().collect());
    }
}
