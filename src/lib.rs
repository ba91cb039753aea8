pub mod app;
pub mod config;
pub mod palette;
pub mod render;
pub mod rng;
pub mod terminal;
pub mod visual;
