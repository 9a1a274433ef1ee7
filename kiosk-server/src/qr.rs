//! QR image collaborator
//!
//! Tickets embed a QR glyph encoding a configurable URL. Rendering is
//! delegated to an external service that returns a PNG for a payload
//! string; a failure there fails only the one print attempt.

use crate::error::{KioskError, KioskResult};
use image::DynamicImage;
use std::time::Duration;

/// Source of QR glyphs; seam for composing tickets in tests
#[allow(async_fn_in_trait)]
pub trait QrSource {
    /// Fetch the QR image for one (number, waiting-count) pair
    async fn fetch(&self, number: u32, waiting: u32) -> KioskResult<DynamicImage>;
}

/// HTTP QR rendering client
#[derive(Debug, Clone)]
pub struct QrClient {
    client: reqwest::Client,
    service_url: String,
    template: String,
}

impl QrClient {
    /// `service_url` is the external renderer; `template` carries
    /// `{number}` and `{waiting}` placeholders.
    pub fn new(service_url: impl Into<String>, template: impl Into<String>) -> KioskResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(6))
            .build()?;
        Ok(Self {
            client,
            service_url: service_url.into(),
            template: template.into(),
        })
    }

    /// Substitute the placeholders into the payload template
    pub fn payload(&self, number: u32, waiting: u32) -> String {
        self.template
            .replace("{number}", &number.to_string())
            .replace("{waiting}", &waiting.to_string())
    }
}

impl QrSource for QrClient {
    async fn fetch(&self, number: u32, waiting: u32) -> KioskResult<DynamicImage> {
        let payload = self.payload(number, waiting);
        // 800x800, margin 2, ECC M: sized for a clean downscale to the
        // ticket canvas without losing module edges
        let url = format!(
            "{}?size=800x800&format=png&margin=2&ecc=M&data={}",
            self.service_url,
            urlencoding::encode(&payload)
        );

        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(KioskError::Qr(format!(
                "QR service returned {}",
                resp.status()
            )));
        }

        let bytes = resp.bytes().await?;
        Ok(image::load_from_memory(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_substitutes_both_placeholders() {
        let client = QrClient::new(
            "https://qr.example/render",
            "https://example.com/?no={number}&waiting={waiting}",
        )
        .unwrap();
        assert_eq!(
            client.payload(21, 5),
            "https://example.com/?no=21&waiting=5"
        );
    }

    #[test]
    fn payload_without_placeholders_is_unchanged() {
        let client = QrClient::new("https://qr.example/render", "https://example.com/menu").unwrap();
        assert_eq!(client.payload(1, 0), "https://example.com/menu");
    }
}
