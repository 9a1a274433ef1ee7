//! Error types for the kiosk server

use thiserror::Error;

/// Kiosk error types
#[derive(Debug, Error)]
pub enum KioskError {
    /// Status feed unreachable or returned invalid data
    #[error("Status feed error: {0}")]
    StatusFeed(String),

    /// Speech synthesis collaborator failure
    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    /// QR rendering collaborator failure
    #[error("QR service error: {0}")]
    Qr(String),

    /// Ticket bitmap composition failure
    #[error("Ticket composition failed: {0}")]
    Compose(String),

    /// Printer transport failure
    #[error("Print failed: {0}")]
    Print(#[from] kiosk_printer::PrintError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decode/encode error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type for kiosk operations
pub type KioskResult<T> = Result<T, KioskError>;
