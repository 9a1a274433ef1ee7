//! GS v 0 frame builder
//!
//! Builds the exact byte stream a raster ticket is sent as. The framing is
//! fixed by hardware compatibility and must be reproduced byte-for-byte:
//! init, line spacing, raster header with little-endian dimensions, packed
//! raster data, feed, cut.

use crate::raster::RasterBitmap;

/// ESC/POS raster frame builder
///
/// Accumulates the wire bytes for one print job. `new()` emits the
/// initialize and default-line-spacing sequences; callers append the
/// raster block and the trailing feed + cut.
pub struct RasterFrame {
    buf: Vec<u8>,
}

impl RasterFrame {
    /// Create a new frame with printer init (ESC @) and standard
    /// line spacing (ESC 2) already emitted
    pub fn new() -> Self {
        let mut buf = Vec::with_capacity(4096);
        buf.extend_from_slice(&[0x1B, 0x40]);
        buf.extend_from_slice(&[0x1B, 0x32]);
        Self { buf }
    }

    /// Append a raster bit image block (GS v 0)
    ///
    /// The four dimension bytes are width-in-bytes then height-in-rows,
    /// each as a little-endian u16.
    pub fn raster(&mut self, raster: &RasterBitmap) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x76, 0x30, 0x00]);
        self.buf.push((raster.width_bytes & 0xFF) as u8);
        self.buf.push((raster.width_bytes >> 8) as u8);
        self.buf.push((raster.height & 0xFF) as u8);
        self.buf.push((raster.height >> 8) as u8);
        self.buf.extend_from_slice(&raster.bytes);
        self
    }

    /// Feed `lines` newline characters of paper
    pub fn feed(&mut self, lines: u8) -> &mut Self {
        for _ in 0..lines {
            self.buf.push(b'\n');
        }
        self
    }

    /// Cut paper (GS V 0, full cut)
    pub fn cut(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x00]);
        self
    }

    /// Write raw bytes directly
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Build the final byte buffer
    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for RasterFrame {
    fn default() -> Self {
        Self::new()
    }
}

/// Frame a complete ticket: init + raster + 3-line feed + cut
pub fn frame_ticket(raster: &RasterBitmap) -> Vec<u8> {
    let mut frame = RasterFrame::new();
    frame.raster(raster).feed(3).cut();
    frame.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raster(width_bytes: u16, height: u16) -> RasterBitmap {
        RasterBitmap {
            bytes: vec![0xAA; width_bytes as usize * height as usize],
            width_bytes,
            height,
        }
    }

    #[test]
    fn header_dimensions_little_endian() {
        let mut frame = RasterFrame::new();
        frame.raster(&raster(48, 300));
        let data = frame.build();

        // Skip init (2) + line spacing (2), then the GS v 0 opcode
        assert_eq!(&data[4..8], &[0x1D, 0x76, 0x30, 0x00]);
        // 48 = 0x30, 300 = 0x012C split low/high
        assert_eq!(&data[8..12], &[0x30, 0x00, 0x2C, 0x01]);
    }

    #[test]
    fn full_ticket_frame_layout() {
        let r = raster(2, 1);
        let data = frame_ticket(&r);

        let mut expected = vec![0x1B, 0x40, 0x1B, 0x32];
        expected.extend_from_slice(&[0x1D, 0x76, 0x30, 0x00, 0x02, 0x00, 0x01, 0x00]);
        expected.extend_from_slice(&[0xAA, 0xAA]);
        expected.extend_from_slice(b"\n\n\n");
        expected.extend_from_slice(&[0x1D, 0x56, 0x00]);
        assert_eq!(data, expected);
    }
}
