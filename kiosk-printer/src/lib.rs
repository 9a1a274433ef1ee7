//! # kiosk-printer
//!
//! GS v 0 raster printing for ESC/POS thermal printers - low-level only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - Monochrome raster encoding (resize, sharpen, threshold, bit packing)
//! - GS v 0 frame building (init, raster header, feed, cut)
//! - Network printing (TCP port 9100)
//!
//! Business logic (WHAT to print) stays in application code:
//! - Ticket composition and queue reconciliation → kiosk-server
//!
//! ## Example
//!
//! ```ignore
//! use kiosk_printer::{NetworkPrinter, Printer, RasterFrame, RasterOptions, encode_raster};
//!
//! // Encode an image into a packed 1-bit raster
//! let raster = encode_raster(&img, &RasterOptions::default())?;
//!
//! // Frame it: init + line spacing + GS v 0 header + data + feed + cut
//! let mut frame = RasterFrame::new();
//! frame.raster(&raster).feed(3).cut();
//!
//! // Send to the printer
//! let printer = NetworkPrinter::new("192.168.0.151", 9100)?;
//! printer.print(&frame.build()).await?;
//! ```

mod error;
mod frame;
mod printer;
mod raster;

// Re-exports
pub use error::{PrintError, PrintResult};
pub use frame::{RasterFrame, frame_ticket};
pub use printer::{NetworkPrinter, Printer};
pub use raster::{RasterBitmap, RasterOptions, encode_raster};
