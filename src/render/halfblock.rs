use crate::render::{
    Frame, Renderer, composite_px, text_frame_begin, text_frame_end, write_bg_rgb, write_fg_rgb,
};
use std::io::Write;

/// Two pixels per cell via U+2580: foreground paints the top pixel,
/// background the bottom. Color escapes are cached per frame since
/// adjacent orb pixels rarely differ.
pub struct HalfBlockRenderer {
    last_fg: Option<(u8, u8, u8)>,
    last_bg: Option<(u8, u8, u8)>,
}

impl HalfBlockRenderer {
    pub fn new() -> Self {
        Self {
            last_fg: None,
            last_bg: None,
        }
    }
}

impl Default for HalfBlockRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for HalfBlockRenderer {
    fn name(&self) -> &'static str {
        "half-block"
    }

    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
        let Some((cols, visual_rows, w, _h)) = text_frame_begin(frame, 1, 2, out)? else {
            return Ok(());
        };

        self.last_fg = None;
        self.last_bg = None;

        const HALF_BLOCK: char = '\u{2580}';

        for row in 0..visual_rows {
            let top_y = row * 2;
            let bot_y = top_y + 1;
            for x in 0..cols {
                let top = composite_px(frame, (top_y * w + x) * 4);
                let bot = composite_px(frame, (bot_y * w + x) * 4);

                if self.last_fg != Some(top) {
                    write_fg_rgb(out, top.0, top.1, top.2)?;
                    self.last_fg = Some(top);
                }
                if self.last_bg != Some(bot) {
                    write_bg_rgb(out, bot.0, bot.1, bot.2)?;
                    self.last_bg = Some(bot);
                }
                write!(out, "{HALF_BLOCK}")?;
            }
            out.write_all(b"\r\n")?;
        }

        text_frame_end(frame, cols, visual_rows, out)
    }
}
