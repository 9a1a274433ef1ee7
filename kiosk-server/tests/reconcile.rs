//! Reconciliation loop scenarios
//!
//! Drives `QueueMonitor::cycle` against scripted status feeds and fake
//! collaborators, checking the print-once, epoch-reset and eviction
//! contracts end to end.

use kiosk_server::{
    AudioCache, KioskError, KioskResult, PrintedSetStore, QueueMonitor, QueueSnapshot,
    SpeechSynthesizer, StatusSource, TicketEmitter,
};
use std::collections::{HashSet, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::{TempDir, tempdir};

/// Scripted status feed: each fetch pops the next response
struct ScriptedStatus {
    responses: Mutex<VecDeque<KioskResult<QueueSnapshot>>>,
}

impl ScriptedStatus {
    fn new(responses: Vec<KioskResult<QueueSnapshot>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

impl StatusSource for ScriptedStatus {
    async fn fetch(&self) -> KioskResult<QueueSnapshot> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(KioskError::StatusFeed("script exhausted".into())))
    }
}

fn snapshot(waiting: &[u32], current: Option<u32>) -> KioskResult<QueueSnapshot> {
    let waiting = waiting.to_vec();
    let current = current.or_else(|| waiting.iter().min().copied());
    Ok(QueueSnapshot { waiting, current })
}

/// Recording ticket emitter; numbers in `fail` refuse to print
#[derive(Clone, Default)]
struct RecordingEmitter {
    printed: Arc<Mutex<Vec<(u32, u32)>>>,
    fail: Arc<Mutex<HashSet<u32>>>,
    cleared: Arc<AtomicUsize>,
}

impl RecordingEmitter {
    fn printed(&self) -> Vec<(u32, u32)> {
        self.printed.lock().unwrap().clone()
    }

    fn fail_number(&self, n: u32) {
        self.fail.lock().unwrap().insert(n);
    }
}

impl TicketEmitter for RecordingEmitter {
    async fn print_ticket(&self, number: u32, waiting: u32) -> KioskResult<()> {
        if self.fail.lock().unwrap().contains(&number) {
            return Err(KioskError::StatusFeed(format!("printer down for {number}")));
        }
        self.printed.lock().unwrap().push((number, waiting));
        Ok(())
    }

    async fn clear_artifacts(&self) {
        self.cleared.fetch_add(1, Ordering::SeqCst);
    }
}

struct StubSynth;

impl SpeechSynthesizer for StubSynth {
    async fn synthesize(&self, _text: &str) -> KioskResult<Vec<u8>> {
        Ok(vec![0xFF])
    }
}

struct Fixture {
    _dir: TempDir,
    emitter: RecordingEmitter,
    store: Arc<PrintedSetStore>,
    audio_dir: std::path::PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        let store = Arc::new(PrintedSetStore::open(dir.path().join("printed.log")).unwrap());
        let audio_dir = dir.path().join("audio");
        Self {
            _dir: dir,
            emitter: RecordingEmitter::default(),
            store,
            audio_dir,
        }
    }

    fn monitor(
        &self,
        responses: Vec<KioskResult<QueueSnapshot>>,
    ) -> QueueMonitor<ScriptedStatus, RecordingEmitter, StubSynth> {
        QueueMonitor::new(
            ScriptedStatus::new(responses),
            self.emitter.clone(),
            AudioCache::new(&self.audio_dir, StubSynth),
            self.store.clone(),
            Duration::from_secs(2),
        )
    }
}

fn audio_exists(dir: &Path, n: u32) -> bool {
    dir.join(format!("{n}.mp3")).exists()
}

#[tokio::test]
async fn new_numbers_print_once_in_ascending_order() {
    let fx = Fixture::new();
    let mut monitor = fx.monitor(vec![
        snapshot(&[8, 7], None),
        snapshot(&[8, 7], None), // same set again: no new delta
    ]);

    monitor.cycle().await;
    monitor.cycle().await;

    // 7 before 8, each exactly once, waiting count attached
    assert_eq!(fx.emitter.printed(), vec![(7, 2), (8, 2)]);
    assert!(fx.store.contains(7));
    assert!(fx.store.contains(8));
    assert!(audio_exists(&fx.audio_dir, 7));
    assert!(audio_exists(&fx.audio_dir, 8));
}

#[tokio::test]
async fn epoch_reset_clears_store_before_delta() {
    let fx = Fixture::new();
    for n in [5, 6, 7] {
        fx.store.append(n).unwrap();
    }

    let mut monitor = fx.monitor(vec![snapshot(&[1], Some(5))]);
    monitor.cycle().await;

    // Old epoch gone, number 1 printed fresh
    assert!(!fx.store.contains(5));
    assert!(!fx.store.contains(6));
    assert!(!fx.store.contains(7));
    assert_eq!(fx.emitter.printed(), vec![(1, 1)]);
    assert!(fx.store.contains(1));
    assert_eq!(fx.emitter.cleared.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn reset_fires_even_with_large_prior_log() {
    let fx = Fixture::new();
    fx.store.append(50).unwrap();
    fx.store.append(51).unwrap();

    let mut monitor = fx.monitor(vec![snapshot(&[1, 2, 3], None)]);
    monitor.cycle().await;

    assert!(!fx.store.contains(50));
    assert_eq!(fx.emitter.printed(), vec![(1, 3), (2, 3), (3, 3)]);
}

#[tokio::test]
async fn print_failure_is_not_recorded_as_printed() {
    let fx = Fixture::new();
    fx.emitter.fail_number(7);

    let mut monitor = fx.monitor(vec![
        snapshot(&[7], None),
        snapshot(&[7], None), // not a new delta: no retry
        snapshot(&[7, 9], None),
    ]);
    monitor.cycle().await;
    assert!(!fx.store.contains(7));

    monitor.cycle().await;
    monitor.cycle().await;

    // Only 9 printed; 7 stayed failed and never resurfaced as a delta
    assert_eq!(fx.emitter.printed(), vec![(9, 2)]);
    assert!(!fx.store.contains(7));
    assert!(fx.store.contains(9));
}

#[tokio::test]
async fn fetch_failure_skips_cycle_without_state_change() {
    let fx = Fixture::new();
    let mut monitor = fx.monitor(vec![
        Err(KioskError::StatusFeed("connection refused".into())),
        snapshot(&[7], None),
    ]);

    monitor.cycle().await;
    assert!(fx.emitter.printed().is_empty());

    // Next cycle still sees 7 as new relative to the untouched snapshot
    monitor.cycle().await;
    assert_eq!(fx.emitter.printed(), vec![(7, 1)]);
}

#[tokio::test]
async fn printed_log_guards_across_restart() {
    let fx = Fixture::new();
    fx.store.append(7).unwrap();

    // Fresh monitor (empty previous-waiting) simulating a process restart
    let mut monitor = fx.monitor(vec![snapshot(&[7, 8], None)]);
    monitor.cycle().await;

    assert_eq!(fx.emitter.printed(), vec![(8, 2)]);
}

#[tokio::test]
async fn audio_evicted_outside_keep_set() {
    let fx = Fixture::new();

    // Seed artifacts for 4..=7, then observe only {5,6} waiting
    let cache = AudioCache::new(&fx.audio_dir, StubSynth);
    for n in [4, 5, 6, 7] {
        cache.ensure(n).await.unwrap();
    }

    let mut monitor = fx.monitor(vec![snapshot(&[5, 6], None)]);
    monitor.cycle().await;

    assert!(!audio_exists(&fx.audio_dir, 4));
    assert!(audio_exists(&fx.audio_dir, 5));
    assert!(audio_exists(&fx.audio_dir, 6));
    assert!(!audio_exists(&fx.audio_dir, 7));
}
