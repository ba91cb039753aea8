use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "orb-visualizer",
    version,
    about = "Animated conversational-orb visualizer for truecolor terminals"
)]
pub struct Config {
    /// Explicit color stops as comma-separated hex values (2..=6 entries).
    /// Highest-priority color source.
    #[arg(long)]
    pub colors: Option<String>,

    /// File holding comma-separated hex stops, re-read every frame.
    /// Second-priority color source (the "live" reference).
    #[arg(long)]
    pub colors_file: Option<PathBuf>,

    /// Named preset from the built-in catalog. Third-priority color
    /// source; unknown names fall through to the default.
    #[arg(long)]
    pub preset: Option<String>,

    /// Seed for the lobe offsets; random when omitted.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Milliseconds to wait after the last resize event before the pixel
    /// buffers are rebuilt.
    #[arg(long, default_value_t = 100)]
    pub resize_debounce: u64,

    #[arg(long, value_enum, default_value_t = AgentState::None)]
    pub agent_state: AgentState,

    #[arg(long, value_enum, default_value_t = VolumeMode::Auto)]
    pub volume_mode: VolumeMode,

    /// Manual input volume in [0, 1]; consulted only in manual mode.
    #[arg(long)]
    pub manual_input: Option<f32>,

    /// Manual output volume in [0, 1]; consulted only in manual mode.
    #[arg(long)]
    pub manual_output: Option<f32>,

    /// File holding two floats (input and output volume), re-read every
    /// frame. Fallback source after the manual flags in manual mode.
    #[arg(long)]
    pub volume_file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Theme::Dark)]
    pub theme: Theme,

    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    #[arg(long, value_enum, default_value_t = RendererMode::HalfBlock)]
    pub renderer: RendererMode,

    /// Print the preset catalog and exit.
    #[arg(long, default_value_t = false)]
    pub list_presets: bool,
}

/// Conversational state supplied by the host; selects the synthesized
/// volume waveforms in auto mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AgentState {
    None,
    Thinking,
    Listening,
    Talking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VolumeMode {
    Auto,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Theme {
    Dark,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RendererMode {
    #[value(name = "half-block", alias = "halfblock", alias = "hb")]
    HalfBlock,
    #[value(alias = "ansi", alias = "text")]
    Ascii,
}
