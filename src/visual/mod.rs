mod noise;
pub mod shader;

pub use noise::{NoiseField, noise2};
pub use shader::Snapshot;

use crate::config::{AgentState, VolumeMode};
use crate::palette::{DEFAULT_STOPS, Rgb};
use crate::rng::SeededRng;

/// Clamp to [0, 1]; non-finite input degrades to 0.
pub fn clamp01(x: f32) -> f32 {
    if !x.is_finite() { 0.0 } else { x.clamp(0.0, 1.0) }
}

/// External inputs snapshotted once at the start of a frame. The engine
/// never owns any of these; the host re-reads its sources (live volume
/// refs, pull accessors, resolved color list, theme) between frames.
#[derive(Clone, Copy)]
pub struct FrameInputs<'a> {
    pub agent_state: AgentState,
    pub volume_mode: VolumeMode,
    pub manual_input: Option<f32>,
    pub manual_output: Option<f32>,
    pub live_input: Option<f32>,
    pub live_output: Option<f32>,
    pub pulled_input: Option<f32>,
    pub pulled_output: Option<f32>,
    /// Resolved color stops for this frame (2..=6 entries; read cyclically).
    pub stops: &'a [Rgb],
    /// Theme-driven ramp inversion (dark mode).
    pub inverted: bool,
}

impl Default for FrameInputs<'_> {
    fn default() -> Self {
        Self {
            agent_state: AgentState::None,
            volume_mode: VolumeMode::Auto,
            manual_input: None,
            manual_output: None,
            live_input: None,
            live_output: None,
            pulled_input: None,
            pulled_output: None,
            stops: &DEFAULT_STOPS,
            inverted: false,
        }
    }
}

/// Continuous animation state. Owned by one [`OrbEngine`], mutated only by
/// [`OrbEngine::advance`], and read by the shader as a snapshot.
#[derive(Clone)]
pub struct OrbState {
    /// Simulated seconds; advances at half real-time.
    pub time: f64,
    /// Volume-dependent animation phase driving the flow warp.
    pub phase: f64,
    pub input_level: f32,
    pub output_level: f32,
    pub anim_speed: f32,
    /// Fade-in alpha; rises linearly to 1 and never regresses.
    pub opacity: f32,
    pub color_slots: [Rgb; 6],
    pub inverted: bool,
}

pub struct OrbEngine {
    state: OrbState,
    offsets: [f32; 7],
    noise: NoiseField,
}

impl OrbEngine {
    /// `initial_stops` seeds the color slots so the first frames don't ease
    /// in from an unrelated color.
    pub fn new(seed: Option<u32>, initial_stops: &[Rgb]) -> Self {
        let mut rng = match seed {
            Some(s) => SeededRng::new(s),
            None => SeededRng::from_entropy(),
        };
        let mut offsets = [0.0f32; 7];
        for o in &mut offsets {
            *o = rng.next_angle();
        }

        let mut color_slots = [DEFAULT_STOPS[0]; 6];
        if !initial_stops.is_empty() {
            for (i, slot) in color_slots.iter_mut().enumerate() {
                *slot = initial_stops[i % initial_stops.len()];
            }
        }

        Self {
            state: OrbState {
                time: 0.0,
                phase: 0.1,
                input_level: 0.0,
                output_level: 0.0,
                anim_speed: 0.1,
                opacity: 0.0,
                color_slots,
                inverted: false,
            },
            offsets,
            noise: NoiseField::new(),
        }
    }

    pub fn state(&self) -> &OrbState {
        &self.state
    }

    pub fn offsets(&self) -> &[f32; 7] {
        &self.offsets
    }

    /// Advance every animation-facing number once for an elapsed real-time
    /// delta. Smoothing gains (0.2, 0.12, 0.08) apply per rendered frame,
    /// not scaled by `dt`; the convergence tests depend on the frame-based
    /// cadence.
    pub fn advance(&mut self, dt: f32, inputs: &FrameInputs) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let s = &mut self.state;

        s.time += dt as f64 * 0.5;
        if s.opacity < 1.0 {
            s.opacity = (s.opacity + dt * 2.0).min(1.0);
        }

        let (target_in, target_out) = match inputs.volume_mode {
            VolumeMode::Manual => {
                let pick = |manual: Option<f32>, live: Option<f32>, pulled: Option<f32>| {
                    clamp01(manual.or(live).or(pulled).unwrap_or(0.0))
                };
                (
                    pick(inputs.manual_input, inputs.live_input, inputs.pulled_input),
                    pick(inputs.manual_output, inputs.live_output, inputs.pulled_output),
                )
            }
            VolumeMode::Auto => {
                let t = (s.time * 2.0) as f32;
                match inputs.agent_state {
                    AgentState::None => (0.0, 0.3),
                    AgentState::Listening => (clamp01(0.55 + (t * 3.2).sin() * 0.35), 0.45),
                    AgentState::Talking => (
                        clamp01(0.65 + (t * 4.8).sin() * 0.22),
                        clamp01(0.75 + (t * 3.6).sin() * 0.22),
                    ),
                    AgentState::Thinking => {
                        let base = 0.38 + 0.07 * (t * 0.7).sin();
                        let wander = 0.05 * (t * 2.1).sin() * (t * 0.37 + 1.2).sin();
                        (
                            clamp01(base + wander),
                            clamp01(0.48 + 0.12 * (t * 1.05 + 0.6).sin()),
                        )
                    }
                }
            }
        };

        s.input_level += (target_in - s.input_level) * 0.2;
        s.output_level += (target_out - s.output_level) * 0.2;

        let target_speed = 0.1 + (1.0 - (s.output_level - 1.0).powi(2)) * 0.9;
        s.anim_speed += (target_speed - s.anim_speed) * 0.12;
        s.phase += (dt * s.anim_speed) as f64;

        if !inputs.stops.is_empty() {
            for (i, slot) in s.color_slots.iter_mut().enumerate() {
                let target = inputs.stops[i % inputs.stops.len()];
                *slot = slot.lerp(target, 0.08);
            }
        }

        s.inverted = inputs.inverted;
    }

    /// Uniform snapshot for one frame of shading.
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            time: self.state.time as f32,
            phase: self.state.phase as f32,
            input_level: self.state.input_level,
            output_level: self.state.output_level,
            opacity: self.state.opacity,
            inverted: self.state.inverted,
            colors: self.state.color_slots,
            offsets: self.offsets,
            noise: &self.noise,
        }
    }

    /// Render the current state into a straight-alpha RGBA8 buffer.
    pub fn render(&self, w: usize, h: usize, out: &mut [u8]) {
        shader::render_frame(&self.snapshot(), w, h, out);
    }
}
