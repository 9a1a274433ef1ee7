//! Ticket print service
//!
//! Drives one physical print: compose the ticket face, encode it into the
//! printer raster, frame it, and stream it to the network printer for the
//! configured number of copies. Failures come back as explicit results;
//! the caller decides what a failed print means for reconciliation state.

use crate::error::KioskResult;
use crate::qr::QrSource;
use crate::ticket::{TicketComposer, clear_ticket_artifacts};
use kiosk_printer::{NetworkPrinter, Printer, RasterOptions, encode_raster, frame_ticket};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, instrument};

/// Pause between consecutive physical copies of one ticket
const COPY_PAUSE: Duration = Duration::from_millis(500);

/// Fixed ticket number used for operator test prints
pub const TEST_TICKET_NUMBER: u32 = 999;

/// Sink for composed tickets; seam for testing the reconciler
#[allow(async_fn_in_trait)]
pub trait TicketEmitter {
    /// Print one ticket (all configured copies); an error means the
    /// number must not be recorded as printed
    async fn print_ticket(&self, number: u32, waiting: u32) -> KioskResult<()>;

    /// Discard composed ticket artifacts (queue epoch rollover)
    async fn clear_artifacts(&self);
}

/// Compose → raster → frame → transmit pipeline
pub struct TicketPrintService<Q> {
    composer: TicketComposer<Q>,
    printer: NetworkPrinter,
    raster_opts: RasterOptions,
    copies: u32,
    artifact_dir: PathBuf,
}

impl<Q: QrSource> TicketPrintService<Q> {
    pub fn new(
        composer: TicketComposer<Q>,
        printer: NetworkPrinter,
        raster_opts: RasterOptions,
        copies: u32,
        artifact_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            composer,
            printer,
            raster_opts,
            copies,
            artifact_dir: artifact_dir.into(),
        }
    }

    /// Print a ticket with an explicit copy count
    ///
    /// Copies are sequential with a short pause between them; the first
    /// failure aborts the remaining copies and is returned to the caller.
    #[instrument(skip(self))]
    pub async fn print_copies(&self, number: u32, waiting: u32, copies: u32) -> KioskResult<()> {
        let img = self.composer.compose(number, waiting).await?;
        let raster = encode_raster(&img, &self.raster_opts)?;
        let frame = frame_ticket(&raster);

        for copy in 0..copies {
            self.printer.print(&frame).await?;
            if copy + 1 < copies {
                tokio::time::sleep(COPY_PAUSE).await;
            }
        }

        info!(number, copies, "ticket printed");
        Ok(())
    }

    /// Operator test print: fixed number 999, current waiting count
    pub async fn print_test(&self, waiting: u32, copies: Option<u32>) -> KioskResult<()> {
        let copies = copies.map(crate::config::clamp_copies).unwrap_or(self.copies);
        self.print_copies(TEST_TICKET_NUMBER, waiting, copies).await
    }

    /// Quick reachability probe of the configured printer
    pub async fn printer_online(&self) -> bool {
        self.printer.is_online().await
    }
}

impl<Q: QrSource> TicketEmitter for TicketPrintService<Q> {
    async fn print_ticket(&self, number: u32, waiting: u32) -> KioskResult<()> {
        self.print_copies(number, waiting, self.copies).await
    }

    async fn clear_artifacts(&self) {
        clear_ticket_artifacts(&self.artifact_dir).await;
    }
}
