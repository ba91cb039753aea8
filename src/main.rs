use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cfg = orb_visualizer::config::Config::parse();
    if cfg.list_presets {
        for name in orb_visualizer::palette::PRESET_NAMES {
            println!("{name}");
        }
        return Ok(());
    }

    orb_visualizer::app::run(cfg)
}
