use crate::render::{
    Frame, Renderer, composite_px, luma_u8, text_frame_begin, text_frame_end, write_fg_rgb,
};
use std::io::Write;

pub struct AsciiRenderer {
    last_fg: Option<(u8, u8, u8)>,
}

impl AsciiRenderer {
    pub fn new() -> Self {
        Self { last_fg: None }
    }
}

impl Default for AsciiRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for AsciiRenderer {
    fn name(&self) -> &'static str {
        "ascii"
    }

    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
        let Some((cols, visual_rows, w, _h)) = text_frame_begin(frame, 1, 1, out)? else {
            return Ok(());
        };

        self.last_fg = None;

        // Dark -> bright ramp, ASCII-safe.
        const RAMP: &[u8] = b" .,:;irsXA253hMHGS#9B&@";

        for y in 0..visual_rows {
            for x in 0..cols {
                let (r, g, b) = composite_px(frame, (y * w + x) * 4);
                let l = luma_u8(r, g, b) as usize;
                let ch = RAMP[l * (RAMP.len() - 1) / 255];

                if self.last_fg != Some((r, g, b)) {
                    write_fg_rgb(out, r, g, b)?;
                    self.last_fg = Some((r, g, b));
                }
                out.write_all(&[ch])?;
            }
            out.write_all(b"\r\n")?;
        }

        text_frame_end(frame, cols, visual_rows, out)
    }
}
