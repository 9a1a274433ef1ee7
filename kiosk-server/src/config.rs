//! Kiosk configuration
//!
//! All values can be overridden via environment variables:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | WORK_DIR | ./data | Audio, ticket artifacts and the printed log |
//! | STATUS_URL | (demo endpoint) | Upstream queue status feed |
//! | PRINTER_IP | 192.168.0.151 | Thermal printer, raw TCP port 9100 |
//! | PRINTER_MAX_DOTS | 384 | Print head width in dots |
//! | PRINT_THRESHOLD | 128 | Raster binarization threshold |
//! | PRINT_COPIES | 1 | Physical copies per ticket (1-10) |
//! | QR_URL_TEMPLATE | example.com template | `{number}`/`{waiting}` placeholders |
//! | QR_SERVICE_URL | api.qrserver.com | External QR PNG renderer |
//! | TTS_URL | translate.google.com tts | External speech synthesis |
//! | POLL_INTERVAL_SECS | 2 | Reconciliation period |
//! | TICKET_FONT | (bundled path) | TTF/OTF used for ticket text |

use std::path::PathBuf;

/// Upper bound on physical copies per ticket
pub const MAX_PRINT_COPIES: u32 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for audio/print artifacts and the printed log
    pub work_dir: PathBuf,
    /// Upstream queue status endpoint
    pub status_url: String,
    /// Printer host; port is fixed at 9100
    pub printer_ip: String,
    /// Print head dot width
    pub printer_max_dots: u32,
    /// Raster binarization threshold
    pub print_threshold: u8,
    /// Physical copies per ticket, clamped to 1..=10
    pub print_copies: u32,
    /// QR payload template with {number}/{waiting} placeholders
    pub qr_url_template: String,
    /// External QR PNG rendering service base URL
    pub qr_service_url: String,
    /// External speech synthesis base URL
    pub tts_url: String,
    /// Reconciliation poll period in seconds
    pub poll_interval_secs: u64,
    /// Font file for ticket text; falls back to system candidates when unset
    pub ticket_font: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables, with defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            status_url: std::env::var("STATUS_URL")
                .unwrap_or_else(|_| "http://localhost:8000/status".into()),
            printer_ip: std::env::var("PRINTER_IP").unwrap_or_else(|_| "192.168.0.151".into()),
            printer_max_dots: std::env::var("PRINTER_MAX_DOTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(384),
            print_threshold: std::env::var("PRINT_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(128),
            print_copies: std::env::var("PRINT_COPIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(clamp_copies)
                .unwrap_or(1),
            qr_url_template: std::env::var("QR_URL_TEMPLATE")
                .unwrap_or_else(|_| "https://example.com/?no={number}&waiting={waiting}".into()),
            qr_service_url: std::env::var("QR_SERVICE_URL")
                .unwrap_or_else(|_| "https://api.qrserver.com/v1/create-qr-code/".into()),
            tts_url: std::env::var("TTS_URL")
                .unwrap_or_else(|_| "https://translate.google.com/translate_tts".into()),
            poll_interval_secs: std::env::var("POLL_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
            ticket_font: std::env::var("TICKET_FONT").ok().map(PathBuf::from),
        }
    }

    /// Audio artifact directory
    pub fn audio_dir(&self) -> PathBuf {
        self.work_dir.join("audio")
    }

    /// Ticket artifact directory (background image, printed log, debug PNGs)
    pub fn print_dir(&self) -> PathBuf {
        self.work_dir.join("print")
    }

    /// Printed-numbers log path
    pub fn printed_log(&self) -> PathBuf {
        self.print_dir().join("printed.log")
    }

    /// Ticket background image path, used when present
    pub fn background_path(&self) -> PathBuf {
        self.print_dir().join("bg.jpg")
    }
}

/// Clamp a copy count into the allowed 1..=10 range
pub fn clamp_copies(count: u32) -> u32 {
    count.clamp(1, MAX_PRINT_COPIES)
}
