//! Speech synthesis collaborator
//!
//! The kiosk only needs "given a phrase, obtain audio bytes"; the actual
//! synthesis runs in an external HTTP service with its own latency and
//! failure behavior.

use crate::error::{KioskError, KioskResult};
use std::time::Duration;

/// Synthesis seam; the reconciler and audio cache are generic over this
#[allow(async_fn_in_trait)]
pub trait SpeechSynthesizer {
    /// Synthesize a zh-TW phrase into audio bytes (mp3)
    async fn synthesize(&self, text: &str) -> KioskResult<Vec<u8>>;
}

/// HTTP speech synthesis client
#[derive(Debug, Clone)]
pub struct SpeechClient {
    client: reqwest::Client,
    base_url: String,
}

impl SpeechClient {
    pub fn new(base_url: impl Into<String>) -> KioskResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

impl SpeechSynthesizer for SpeechClient {
    async fn synthesize(&self, text: &str) -> KioskResult<Vec<u8>> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("ie", "UTF-8"),
                ("tl", "zh-TW"),
                ("client", "tw-ob"),
                ("q", text),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(KioskError::Synthesis(format!(
                "synthesis service returned {}",
                resp.status()
            )));
        }

        Ok(resp.bytes().await?.to_vec())
    }
}
