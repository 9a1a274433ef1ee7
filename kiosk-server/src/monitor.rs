//! Queue reconciliation loop
//!
//! Polls the status feed on a fixed period and, for every ticket number
//! newly seen in the waiting set, prints a physical ticket and synthesizes
//! its announcement exactly once. The printed log guards against duplicate
//! prints across restarts; the in-cycle delta guards within a run. No
//! single cycle failure ever terminates the loop.

use crate::audio::AudioCache;
use crate::print_service::TicketEmitter;
use crate::printed::PrintedSetStore;
use crate::speech::SpeechSynthesizer;
use crate::status::StatusSource;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Background queue monitor
///
/// Owns the previous-waiting snapshot; exactly one instance runs at a
/// time. The store and the audio cache are shared with operator-triggered
/// paths, which is why the store serializes its own mutation.
pub struct QueueMonitor<S, E, Y> {
    status: S,
    emitter: E,
    audio: AudioCache<Y>,
    store: Arc<PrintedSetStore>,
    period: Duration,
    previous_waiting: HashSet<u32>,
}

impl<S, E, Y> QueueMonitor<S, E, Y>
where
    S: StatusSource,
    E: TicketEmitter,
    Y: SpeechSynthesizer,
{
    pub fn new(
        status: S,
        emitter: E,
        audio: AudioCache<Y>,
        store: Arc<PrintedSetStore>,
        period: Duration,
    ) -> Self {
        Self {
            status,
            emitter,
            audio,
            store,
            period,
            previous_waiting: HashSet::new(),
        }
    }

    /// Run until the token is cancelled
    pub async fn run(mut self, shutdown: CancellationToken) {
        info!(period_secs = self.period.as_secs(), "Queue monitor started");

        loop {
            self.cycle().await;

            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Queue monitor received shutdown signal");
                    break;
                }
                _ = tokio::time::sleep(self.period) => {}
            }
        }
    }

    /// One reconciliation pass
    ///
    /// Fetch, detect epoch reset, print the new-delta in ascending order,
    /// ensure audio, evict stale audio, then advance the snapshot.
    pub async fn cycle(&mut self) {
        let snapshot = match self.status.fetch().await {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "Status fetch failed, skipping cycle");
                return;
            }
        };

        // The queue restarted numbering: everything printed belongs to the
        // previous epoch and must go before this cycle's deltas are judged.
        if snapshot.min_waiting() == Some(1) {
            if let Err(e) = self.store.reset() {
                error!(error = %e, "Epoch reset failed, skipping cycle");
                return;
            }
            self.emitter.clear_artifacts().await;
            info!("Queue epoch reset detected, printed log cleared");
        }

        let waiting: HashSet<u32> = snapshot.waiting.iter().copied().collect();
        let new_numbers: BTreeSet<u32> = waiting
            .difference(&self.previous_waiting)
            .copied()
            .collect();
        let waiting_count = snapshot.waiting.len() as u32;

        for &n in &new_numbers {
            if self.store.contains(n) {
                debug!(number = n, "already printed, skipping");
                continue;
            }
            match self.emitter.print_ticket(n, waiting_count).await {
                Ok(()) => {
                    // Append only after a confirmed print; a failed append
                    // risks a duplicate print later, never a missed one
                    if let Err(e) = self.store.append(n) {
                        error!(number = n, error = %e, "Failed to record printed number");
                    }
                }
                Err(e) => {
                    error!(number = n, error = %e, "Failed to print new number");
                }
            }
        }

        for &n in &new_numbers {
            if let Err(e) = self.audio.ensure(n).await {
                warn!(number = n, error = %e, "Failed to synthesize announcement");
            }
        }

        self.audio.evict(&snapshot.keep_set()).await;
        self.previous_waiting = waiting;
    }
}
