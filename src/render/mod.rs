mod ascii;
mod halfblock;

pub use ascii::AsciiRenderer;
pub use halfblock::HalfBlockRenderer;

use std::io::Write;

/// One terminal frame: the orb's straight-alpha pixels plus the layout
/// numbers a cell renderer needs. Alpha is composited over `background`
/// (the theme backdrop) at draw time.
pub struct Frame<'a> {
    pub term_cols: u16,
    pub term_rows: u16,
    pub visual_rows: u16,
    pub pixel_width: usize,
    pub pixel_height: usize,
    pub pixels_rgba: &'a [u8],
    pub background: (u8, u8, u8),
    pub hud: &'a str,
    pub hud_rows: u16,
}

pub trait Renderer {
    fn name(&self) -> &'static str;
    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()>;
}

/// Straight-alpha blend of pixel `i` over the frame background.
#[inline]
pub(crate) fn composite_px(frame: &Frame<'_>, i: usize) -> (u8, u8, u8) {
    let px = &frame.pixels_rgba[i..i + 4];
    let a = px[3] as u32;
    let inv = 255 - a;
    let (br, bg, bb) = frame.background;
    (
        ((px[0] as u32 * a + br as u32 * inv) / 255) as u8,
        ((px[1] as u32 * a + bg as u32 * inv) / 255) as u8,
        ((px[2] as u32 * a + bb as u32 * inv) / 255) as u8,
    )
}

#[inline]
pub(crate) fn luma_u8(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 54 + g as u32 * 183 + b as u32 * 19) >> 8) as u8
}

#[inline]
pub(crate) fn write_fg_rgb(out: &mut dyn Write, r: u8, g: u8, b: u8) -> anyhow::Result<()> {
    write!(out, "\x1b[38;2;{};{};{}m", r, g, b)?;
    Ok(())
}

#[inline]
pub(crate) fn write_bg_rgb(out: &mut dyn Write, r: u8, g: u8, b: u8) -> anyhow::Result<()> {
    write!(out, "\x1b[48;2;{};{};{}m", r, g, b)?;
    Ok(())
}

/// Validate frame geometry and emit the common frame prologue (home,
/// reset, autowrap off). Returns None when the frame should be skipped.
pub(crate) fn text_frame_begin(
    frame: &Frame<'_>,
    px_w_mul: usize,
    px_h_mul: usize,
    out: &mut dyn Write,
) -> anyhow::Result<Option<(usize, usize, usize, usize)>> {
    let cols = frame.term_cols as usize;
    let visual_rows = frame.visual_rows as usize;
    let w = frame.pixel_width;
    let h = frame.pixel_height;

    if cols == 0 || visual_rows == 0 || w == 0 || h == 0 {
        return Ok(None);
    }
    // Geometry mismatch means a resize raced the render; skip the frame
    // rather than index out of bounds.
    if w != cols * px_w_mul || h != visual_rows * px_h_mul {
        return Ok(None);
    }
    if frame.pixels_rgba.len() < w * h * 4 {
        return Ok(None);
    }

    out.write_all(b"\x1b[H\x1b[0m")?;
    // Autowrap off while painting full-width rows; terminals otherwise
    // wrap on the last column and leave visible gaps.
    out.write_all(b"\x1b[?7l")?;
    Ok(Some((cols, visual_rows, w, h)))
}

/// HUD lines, autowrap restore, flush.
pub(crate) fn text_frame_end(
    frame: &Frame<'_>,
    cols: usize,
    visual_rows: usize,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let mut hud_lines = frame.hud.lines();
    for i in 0..(frame.hud_rows as usize) {
        write!(out, "\x1b[{};1H\x1b[0m\x1b[2K", visual_rows + i + 1)?;
        if let Some(mut line) = hud_lines.next() {
            if line.len() > cols {
                line = &line[..cols];
            }
            write!(out, "{line}")?;
        }
    }
    out.write_all(b"\x1b[?7h")?;
    out.flush()?;
    Ok(())
}
