use crate::config::{AgentState, Config, RendererMode, Theme, VolumeMode};
use crate::palette::{Rgb, parse_stop_list, resolve_stops};
use crate::render::{AsciiRenderer, Frame, HalfBlockRenderer, Renderer};
use crate::terminal::TerminalGuard;
use crate::visual::{FrameInputs, OrbEngine};
use anyhow::Context;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::fs;
use std::io::BufWriter;
use std::path::Path;
use std::time::{Duration, Instant};

struct FpsCounter {
    frames: u32,
    last: Instant,
    fps: f32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            frames: 0,
            last: Instant::now(),
            fps: 0.0,
        }
    }

    fn tick(&mut self) {
        self.frames += 1;
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        if dt >= 0.5 {
            self.fps = self.frames as f32 / dt;
            self.frames = 0;
            self.last = now;
        }
    }

    fn fps(&self) -> f32 {
        self.fps
    }
}

/// Live color reference: the file is polled every frame, never owned.
/// Missing or malformed content simply yields no usable source.
fn read_live_colors(path: Option<&Path>) -> Option<Vec<Rgb>> {
    let text = fs::read_to_string(path?).ok()?;
    Some(parse_stop_list(&text))
}

/// Pull volume provider: first two floats in the file, in order
/// input, output. Either may be absent or garbage; the driver's fallback
/// chain and clamp handle both.
fn read_pulled_volumes(path: Option<&Path>) -> (Option<f32>, Option<f32>) {
    let Some(path) = path else {
        return (None, None);
    };
    let Ok(text) = fs::read_to_string(path) else {
        return (None, None);
    };
    let mut nums = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(|t| t.parse::<f32>().ok());
    (nums.next().flatten(), nums.next().flatten())
}

fn hud_line(
    state: AgentState,
    mode: VolumeMode,
    theme: Theme,
    input_level: f32,
    output_level: f32,
    fps: f32,
    renderer: &str,
) -> String {
    format!(
        "orb | state {:?} | vol {:?} | in {:.2} out {:.2} | {:.0} fps | {} | {:?} | q quit, 1-4 state, m mode, i theme",
        state, mode, input_level, output_level, fps, renderer, theme
    )
}

struct Controls {
    agent_state: AgentState,
    volume_mode: VolumeMode,
    theme: Theme,
    manual_input: Option<f32>,
    manual_output: Option<f32>,
    show_hud: bool,
}

/// Apply one key press; returns true when the app should quit.
fn handle_key(code: KeyCode, modifiers: KeyModifiers, c: &mut Controls) -> bool {
    let nudge = |v: Option<f32>, d: f32| Some((v.unwrap_or(0.0) + d).clamp(0.0, 1.0));
    match code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Char('1') => c.agent_state = AgentState::None,
        KeyCode::Char('2') => c.agent_state = AgentState::Thinking,
        KeyCode::Char('3') => c.agent_state = AgentState::Listening,
        KeyCode::Char('4') => c.agent_state = AgentState::Talking,
        KeyCode::Char('m') => {
            c.volume_mode = match c.volume_mode {
                VolumeMode::Auto => VolumeMode::Manual,
                VolumeMode::Manual => VolumeMode::Auto,
            }
        }
        KeyCode::Char('i') => {
            c.theme = match c.theme {
                Theme::Dark => Theme::Light,
                Theme::Light => Theme::Dark,
            }
        }
        KeyCode::Char('h') => c.show_hud = !c.show_hud,
        KeyCode::Char(',') => c.manual_input = nudge(c.manual_input, -0.05),
        KeyCode::Char('.') => c.manual_input = nudge(c.manual_input, 0.05),
        KeyCode::Char('<') => c.manual_output = nudge(c.manual_output, -0.05),
        KeyCode::Char('>') => c.manual_output = nudge(c.manual_output, 0.05),
        _ => {}
    }
    false
}

pub fn run(cfg: Config) -> anyhow::Result<()> {
    let mut term = Some(TerminalGuard::new()?);
    let mut out = BufWriter::new(TerminalGuard::stdout());

    let mut renderer: Box<dyn Renderer> = match cfg.renderer {
        RendererMode::HalfBlock => Box::new(HalfBlockRenderer::new()),
        RendererMode::Ascii => Box::new(AsciiRenderer::new()),
    };
    let (px_w_mul, px_h_mul) = match cfg.renderer {
        RendererMode::HalfBlock => (1usize, 2usize),
        RendererMode::Ascii => (1usize, 1usize),
    };

    let explicit = cfg.colors.as_deref().map(parse_stop_list);
    let initial_live = read_live_colors(cfg.colors_file.as_deref());
    let resolved = resolve_stops(
        explicit.as_deref(),
        initial_live.as_deref(),
        cfg.preset.as_deref(),
    );

    let mut engine = OrbEngine::new(cfg.seed, &resolved);

    let mut last_size = crossterm::terminal::size().context("get terminal size")?;
    if last_size.1 < 2 || last_size.0 < 4 {
        return Err(anyhow::anyhow!(
            "terminal too small (need at least 4x2, got {}x{})",
            last_size.0,
            last_size.1
        ));
    }

    let mut controls = Controls {
        agent_state: cfg.agent_state,
        volume_mode: cfg.volume_mode,
        theme: cfg.theme,
        manual_input: cfg.manual_input,
        manual_output: cfg.manual_output,
        show_hud: true,
    };

    let debounce = Duration::from_millis(cfg.resize_debounce);
    let tick = Duration::from_secs_f32(1.0 / cfg.fps.max(1) as f32);
    let mut pending_resize: Option<(Instant, (u16, u16))> = None;
    let mut reacquire_at: Option<Instant> = None;

    let mut pixels: Vec<u8> = Vec::new();
    let mut fps = FpsCounter::new();
    let mut last_frame = Instant::now();

    loop {
        let now = Instant::now();

        // Drain input events (non-blocking).
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(k) if k.kind != KeyEventKind::Release => {
                    if handle_key(k.code, k.modifiers, &mut controls) {
                        return Ok(());
                    }
                }
                Event::Resize(c, r) => {
                    pending_resize = Some((now, (c, r)));
                }
                _ => {}
            }
        }

        // Size check once per frame (resize events can be missed in some
        // terminals).
        let sz = crossterm::terminal::size()?;
        if sz != last_size && pending_resize.map(|(_, p)| p) != Some(sz) {
            pending_resize = Some((now, sz));
        }

        // Debounced resize: only rebuild once the size has been stable for
        // the configured window.
        if let Some((since, size)) = pending_resize {
            if now.duration_since(since) >= debounce {
                last_size = size;
                pending_resize = None;
            }
        }

        let dt = now.duration_since(last_frame).as_secs_f32().max(1e-6);
        last_frame = now;

        // Snapshot external inputs for this frame.
        let live_stops = read_live_colors(cfg.colors_file.as_deref());
        let (pulled_in, pulled_out) = read_pulled_volumes(cfg.volume_file.as_deref());
        let resolved = resolve_stops(
            explicit.as_deref(),
            live_stops.as_deref(),
            cfg.preset.as_deref(),
        );

        let inputs = FrameInputs {
            agent_state: controls.agent_state,
            volume_mode: controls.volume_mode,
            manual_input: controls.manual_input,
            manual_output: controls.manual_output,
            live_input: None,
            live_output: None,
            pulled_input: pulled_in,
            pulled_output: pulled_out,
            stops: &resolved,
            inverted: controls.theme == Theme::Dark,
        };
        engine.advance(dt, &inputs);

        if term.is_some() {
            let (term_cols, term_rows) = last_size;
            let hud_rows: u16 = if controls.show_hud && term_rows > 2 { 1 } else { 0 };
            let visual_rows = term_rows.saturating_sub(hud_rows).max(1);
            let w = (term_cols as usize) * px_w_mul;
            let h = (visual_rows as usize) * px_h_mul;
            pixels.resize(w * h * 4, 0);

            engine.render(w, h, &mut pixels);

            let background = match controls.theme {
                Theme::Dark => (8u8, 10u8, 16u8),
                Theme::Light => (244u8, 246u8, 250u8),
            };
            let hud = if hud_rows > 0 {
                hud_line(
                    controls.agent_state,
                    controls.volume_mode,
                    controls.theme,
                    engine.state().input_level,
                    engine.state().output_level,
                    fps.fps(),
                    renderer.name(),
                )
            } else {
                String::new()
            };

            let frame = Frame {
                term_cols,
                term_rows,
                visual_rows,
                pixel_width: w,
                pixel_height: h,
                pixels_rgba: &pixels,
                background,
                hud: &hud,
                hud_rows,
            };

            if renderer.render(&frame, &mut out).is_err() {
                // Surface loss. Release the terminal and retry one tick
                // later; the engine state is untouched so the orb resumes
                // where it left off.
                term = None;
                reacquire_at = Some(now + tick);
            }
        } else if reacquire_at.is_some_and(|at| now >= at) {
            match TerminalGuard::new() {
                Ok(guard) => {
                    term = Some(guard);
                    reacquire_at = None;
                    out = BufWriter::new(TerminalGuard::stdout());
                    last_size = crossterm::terminal::size().context("get terminal size")?;
                }
                Err(_) => reacquire_at = Some(now + tick),
            }
        }

        fps.tick();

        // Frame pacing.
        let elapsed = now.elapsed();
        if elapsed < tick {
            std::thread::sleep(tick - elapsed);
        }
    }
}
