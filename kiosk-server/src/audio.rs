//! Announcement audio cache
//!
//! One `{number}.mp3` per ticket number under the audio directory.
//! Artifacts are created on first need and evicted as soon as their number
//! leaves the keep set (waiting ∪ current) for a cycle.

use crate::error::KioskResult;
use crate::numerals::announcement_text;
use crate::speech::SpeechSynthesizer;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Audio artifact cache backed by a directory of mp3 files
pub struct AudioCache<S> {
    dir: PathBuf,
    synthesizer: S,
}

impl<S: SpeechSynthesizer> AudioCache<S> {
    pub fn new(dir: impl Into<PathBuf>, synthesizer: S) -> Self {
        Self {
            dir: dir.into(),
            synthesizer,
        }
    }

    /// Artifact path for a ticket number
    pub fn artifact_path(&self, n: u32) -> PathBuf {
        self.dir.join(format!("{n}.mp3"))
    }

    /// Ensure the announcement audio for `n` exists, synthesizing if needed
    ///
    /// Safe to call concurrently for different numbers. Two concurrent
    /// calls for the same number may both synthesize; the duplicate work is
    /// harmless since the rename is atomic either way.
    pub async fn ensure(&self, n: u32) -> KioskResult<PathBuf> {
        let path = self.artifact_path(n);
        if path.exists() {
            debug!(number = n, "audio artifact already cached");
            return Ok(path);
        }

        fs::create_dir_all(&self.dir).await?;

        let text = announcement_text(n);
        let bytes = self.synthesizer.synthesize(&text).await?;

        // tmp + rename so a crash mid-write never leaves a corrupt artifact
        let tmp = self.dir.join(format!("{n}.mp3.tmp"));
        fs::write(&tmp, &bytes).await?;
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        info!(number = n, bytes = bytes.len(), "audio artifact synthesized");
        Ok(path)
    }

    /// Delete every cached artifact whose number is not in `keep`
    pub async fn evict(&self, keep: &HashSet<u32>) {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(e) => e,
            Err(_) => return,
        };

        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            let Some(n) = parse_artifact_number(&path) else {
                continue;
            };
            if keep.contains(&n) {
                continue;
            }
            match fs::remove_file(&path).await {
                Ok(()) => debug!(number = n, "audio artifact evicted"),
                Err(e) => warn!(number = n, error = %e, "Failed to evict audio artifact"),
            }
        }
    }
}

/// Extract the ticket number from a `{n}.mp3` artifact path
fn parse_artifact_number(path: &Path) -> Option<u32> {
    if path.extension()?.to_str()? != "mp3" {
        return None;
    }
    path.file_stem()?.to_str()?.parse().ok()
}
