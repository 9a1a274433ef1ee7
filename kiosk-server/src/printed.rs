//! Durable printed-numbers store
//!
//! Append-only log of ticket numbers confirmed printed, one integer per
//! line, with an in-memory mirror for fast membership checks. The log is
//! the dedup guard across restarts: a number is appended only after its
//! print succeeded. Reset (queue epoch rollover) truncates both.

use crate::error::KioskResult;
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

struct Inner {
    path: PathBuf,
    mirror: HashSet<u32>,
}

/// Printed-set store: append-only log + in-memory mirror
///
/// Both the reconciliation task and ad-hoc operator actions (test resets)
/// reach this store, so all mutation happens under one lock.
pub struct PrintedSetStore {
    inner: Mutex<Inner>,
}

impl PrintedSetStore {
    /// Open the store, seeding the mirror from any existing log
    pub fn open(path: impl AsRef<Path>) -> KioskResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mirror = match File::open(&path) {
            Ok(file) => BufReader::new(file)
                .lines()
                .map_while(Result::ok)
                .filter_map(|line| line.trim().parse::<u32>().ok())
                .collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashSet::new(),
            Err(e) => return Err(e.into()),
        };

        debug!(path = %path.display(), loaded = mirror.len(), "printed log loaded");

        Ok(Self {
            inner: Mutex::new(Inner { path, mirror }),
        })
    }

    /// Check whether a number was already printed
    ///
    /// Mirror first; on miss, re-scan the log and cache a positive hit.
    pub fn contains(&self, n: u32) -> bool {
        let mut inner = self.inner.lock().expect("printed store lock poisoned");
        if inner.mirror.contains(&n) {
            return true;
        }

        let found = match File::open(&inner.path) {
            Ok(file) => BufReader::new(file)
                .lines()
                .map_while(Result::ok)
                .any(|line| line.trim().parse::<u32>() == Ok(n)),
            Err(_) => false,
        };

        if found {
            inner.mirror.insert(n);
        }
        found
    }

    /// Record a number as printed, flushed to disk immediately
    ///
    /// Callers must check `contains` first; the store does not dedup writes.
    pub fn append(&self, n: u32) -> KioskResult<()> {
        let mut inner = self.inner.lock().expect("printed store lock poisoned");

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&inner.path)?;
        writeln!(file, "{n}")?;
        file.flush()?;
        file.sync_all()?;

        inner.mirror.insert(n);
        debug!(number = n, "printed number recorded");
        Ok(())
    }

    /// Clear the durable log and the mirror together
    pub fn reset(&self) -> KioskResult<()> {
        let mut inner = self.inner.lock().expect("printed store lock poisoned");

        match fs::remove_file(&inner.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        inner.mirror.clear();

        info!("printed log reset");
        Ok(())
    }

    /// Number of known printed entries
    pub fn len(&self) -> usize {
        self.inner.lock().expect("printed store lock poisoned").mirror.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
