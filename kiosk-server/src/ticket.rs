//! Ticket bitmap composition
//!
//! Builds the 384x640 ticket face: optional cover-fit background, the
//! ticket number as large centered text, a waiting-count caption, and a
//! QR glyph near the bottom. Identical inputs and configuration produce
//! pixel-identical output (modulo the external QR renderer).

use crate::error::{KioskError, KioskResult};
use crate::qr::QrSource;
use ab_glyph::{FontVec, PxScale};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Ticket canvas width in printer dots (58mm head)
pub const CANVAS_WIDTH: u32 = 384;
/// Ticket canvas height in dots
pub const CANVAS_HEIGHT: u32 = 640;

/// Vertical offset of the large ticket number
const NUMBER_Y: i32 = 140;
/// Vertical offset of the waiting-count caption
const CAPTION_Y: i32 = 290;
/// QR edge length as a fraction of canvas width (percent)
const QR_WIDTH_PCT: u32 = 45;
/// Bottom margin below the QR glyph
const QR_BOTTOM_MARGIN: u32 = 100;

const NUMBER_SCALE: f32 = 90.0;
const CAPTION_SCALE: f32 = 20.0;

/// System font candidates tried when no font is configured
const FONT_CANDIDATES: &[&str] = &[
    "fonts/NotoSansTC-SemiBold.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansTC-Regular.otf",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/System/Library/Fonts/Supplemental/Songti.ttc",
    "/System/Library/Fonts/PingFang.ttc",
];

/// Load the ticket font, preferring the configured path
pub fn load_ticket_font(configured: Option<&Path>) -> KioskResult<FontVec> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(path) = configured {
        candidates.push(path.to_path_buf());
    }
    candidates.extend(FONT_CANDIDATES.iter().map(PathBuf::from));

    for path in candidates {
        if !path.exists() {
            continue;
        }
        match std::fs::read(&path) {
            Ok(data) => match FontVec::try_from_vec_and_index(data, 0) {
                Ok(font) => {
                    info!(path = %path.display(), "ticket font loaded");
                    return Ok(font);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "Invalid font file"),
            },
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to read font file"),
        }
    }

    Err(KioskError::Compose("no usable ticket font found".into()))
}

/// Cover-fit geometry: uniform scale `max(W/w, H/h)`, then center crop
///
/// Returns (scaled_w, scaled_h, crop_left, crop_top).
fn cover_geometry(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> (u32, u32, u32, u32) {
    let scale = f64::max(dst_w as f64 / src_w as f64, dst_h as f64 / src_h as f64);
    let scaled_w = ((src_w as f64 * scale).round() as u32).max(dst_w);
    let scaled_h = ((src_h as f64 * scale).round() as u32).max(dst_h);
    let left = (scaled_w - dst_w) / 2;
    let top = (scaled_h - dst_h) / 2;
    (scaled_w, scaled_h, left, top)
}

/// Ticket bitmap composer
pub struct TicketComposer<Q> {
    qr: Q,
    font: FontVec,
    /// Cover background, used when the file exists
    background: PathBuf,
    /// Debug artifacts (`ticket_{n}.png`) land here; never read back
    out_dir: PathBuf,
}

impl<Q: QrSource> TicketComposer<Q> {
    pub fn new(
        qr: Q,
        font: FontVec,
        background: impl Into<PathBuf>,
        out_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            qr,
            font,
            background: background.into(),
            out_dir: out_dir.into(),
        }
    }

    /// Compose one ticket face for (number, waiting-count)
    pub async fn compose(&self, number: u32, waiting: u32) -> KioskResult<DynamicImage> {
        let mut canvas =
            RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, Rgba([255, 255, 255, 255]));

        if self.background.exists() {
            self.paste_background(&mut canvas)?;
        }

        // Ticket number, centered by measured width
        let number_text = number.to_string();
        let scale = PxScale::from(NUMBER_SCALE);
        let (text_w, _) = text_size(scale, &self.font, &number_text);
        let x = ((CANVAS_WIDTH as i32 - text_w as i32) / 2).max(0);
        draw_text_mut(
            &mut canvas,
            Rgba([255, 255, 255, 255]),
            x,
            NUMBER_Y,
            scale,
            &self.font,
            &number_text,
        );

        // Waiting-count caption
        let caption = format!("目前 {waiting} 人等候中");
        let scale = PxScale::from(CAPTION_SCALE);
        let (text_w, _) = text_size(scale, &self.font, &caption);
        let x = ((CANVAS_WIDTH as i32 - text_w as i32) / 2).max(0);
        draw_text_mut(
            &mut canvas,
            Rgba([0, 0, 0, 255]),
            x,
            CAPTION_Y,
            scale,
            &self.font,
            &caption,
        );

        // QR glyph, alpha-blended near the bottom
        let qr = self.qr.fetch(number, waiting).await?;
        let qr_size = CANVAS_WIDTH * QR_WIDTH_PCT / 100;
        let qr = qr
            .resize_exact(qr_size, qr_size, FilterType::Lanczos3)
            .to_rgba8();
        let qr_x = (CANVAS_WIDTH - qr_size) / 2;
        let qr_y = CANVAS_HEIGHT - qr_size - QR_BOTTOM_MARGIN;
        imageops::overlay(&mut canvas, &qr, qr_x as i64, qr_y as i64);

        self.save_artifact(number, &canvas).await;

        Ok(DynamicImage::ImageRgba8(canvas))
    }

    /// Scale the stored background with cover fit and center-crop it
    /// onto the canvas
    fn paste_background(&self, canvas: &mut RgbaImage) -> KioskResult<()> {
        let bg = image::open(&self.background)?;
        let (scaled_w, scaled_h, left, top) =
            cover_geometry(bg.width(), bg.height(), CANVAS_WIDTH, CANVAS_HEIGHT);
        let scaled = bg
            .resize_exact(scaled_w, scaled_h, FilterType::Lanczos3)
            .to_rgba8();
        let cropped =
            imageops::crop_imm(&scaled, left, top, CANVAS_WIDTH, CANVAS_HEIGHT).to_image();
        imageops::replace(canvas, &cropped, 0, 0);
        Ok(())
    }

    /// Keep a PNG of the composed face for operator debugging
    async fn save_artifact(&self, number: u32, canvas: &RgbaImage) {
        if let Err(e) = tokio::fs::create_dir_all(&self.out_dir).await {
            warn!(error = %e, "Failed to create ticket artifact directory");
            return;
        }
        let path = self.out_dir.join(format!("ticket_{number}.png"));
        match canvas.save(&path) {
            Ok(()) => debug!(path = %path.display(), "ticket artifact saved"),
            Err(e) => warn!(number, error = %e, "Failed to save ticket artifact"),
        }
    }
}

/// Delete composed ticket artifacts (`ticket_*.png`) from a directory
pub async fn clear_ticket_artifacts(dir: &Path) {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(e) => e,
        Err(_) => return,
    };

    let mut removed = 0usize;
    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.starts_with("ticket_") && name.ends_with(".png") {
            match tokio::fs::remove_file(entry.path()).await {
                Ok(()) => removed += 1,
                Err(e) => warn!(file = name, error = %e, "Failed to remove ticket artifact"),
            }
        }
    }

    if removed > 0 {
        info!(count = removed, "ticket artifacts cleared");
    }
}
