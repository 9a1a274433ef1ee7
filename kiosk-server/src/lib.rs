//! Queue ticket kiosk server
//!
//! Watches a remote queue-status feed and, for every ticket number that
//! newly appears, performs two idempotent side effects exactly once:
//! synthesize a spoken announcement and print a physical ticket on a
//! networked thermal printer.
//!
//! # Module structure
//!
//! ```text
//! kiosk-server/src/
//! ├── config.rs        # Env-backed configuration
//! ├── status.rs        # Queue status feed client
//! ├── monitor.rs       # Reconciliation loop
//! ├── printed.rs       # Durable printed-numbers store
//! ├── ticket.rs        # Ticket bitmap composition
//! ├── print_service.rs # Compose → raster → frame → transmit
//! ├── qr.rs            # QR image collaborator
//! ├── audio.rs         # Announcement audio cache
//! ├── speech.rs        # Speech synthesis collaborator
//! ├── numerals.rs      # Spoken-form numerals
//! └── logger.rs        # Tracing setup
//! ```

pub mod audio;
pub mod config;
pub mod error;
pub mod logger;
pub mod monitor;
pub mod numerals;
pub mod print_service;
pub mod printed;
pub mod qr;
pub mod speech;
pub mod status;
pub mod ticket;

// Re-export public types
pub use audio::AudioCache;
pub use config::Config;
pub use error::{KioskError, KioskResult};
pub use monitor::QueueMonitor;
pub use print_service::{TicketEmitter, TicketPrintService};
pub use printed::PrintedSetStore;
pub use qr::{QrClient, QrSource};
pub use speech::{SpeechClient, SpeechSynthesizer};
pub use status::{QueueSnapshot, StatusClient, StatusSource};
pub use ticket::{TicketComposer, load_ticket_font};
