use std::path::PathBuf;

use clap::Parser;
use gradia_engine::logging::LoggingConfig;
use gradia_engine::window::RuntimeConfig;
use winit::dpi::LogicalSize;

use crate::config::{ExtendMode, GradientConfig, GradientKind, RendererKind, PARAMETER_MAX};

pub const MIN_WIDTH: u32 = 700;
pub const MIN_HEIGHT: u32 = 650;

#[derive(Debug, Clone, Parser)]
#[command(name = "gradients")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compare gradient rendering between the gradia GPU renderer and a CPU reference", long_about = None)]
pub struct DemoOptions {
    /// Backend drawing the canvas at startup
    #[arg(short, long, value_enum, default_value_t = RendererKind::Engine)]
    pub renderer: RendererKind,

    /// Seed for the "Random" button (default: from the OS)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Initial window width in logical pixels (at least 700)
    #[arg(long, default_value_t = MIN_WIDTH)]
    pub width: u32,

    /// Initial window height in logical pixels (at least 650)
    #[arg(long, default_value_t = MIN_HEIGHT)]
    pub height: u32,

    /// TTF/OTF file used for panel labels
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// env_logger filter, e.g. "gradia_demo=debug"
    #[arg(long)]
    pub log: Option<String>,

    /// Render once with the reference backend, write a PNG and exit
    #[arg(long, value_name = "FILE")]
    pub snapshot: Option<PathBuf>,

    /// Initial gradient kind
    #[arg(long, value_enum, default_value_t = GradientKind::Linear)]
    pub kind: GradientKind,

    /// Initial extend mode
    #[arg(long, value_enum, default_value_t = ExtendMode::Pad)]
    pub extend: ExtendMode,

    /// Initial Rad/Angle value
    #[arg(long, default_value_t = PARAMETER_MAX, value_parser = clap::value_parser!(u16).range(0..=i64::from(PARAMETER_MAX)))]
    pub parameter: u16,

    /// Start with dithering enabled
    #[arg(long)]
    pub dither: bool,
}

impl DemoOptions {
    /// Window size after applying the minimum.
    pub fn window_size(&self) -> (u32, u32) {
        (self.width.max(MIN_WIDTH), self.height.max(MIN_HEIGHT))
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        let (w, h) = self.window_size();
        RuntimeConfig {
            title: "Gradients Sample".to_string(),
            initial_size: LogicalSize::new(f64::from(w), f64::from(h)),
            min_size: Some(LogicalSize::new(f64::from(MIN_WIDTH), f64::from(MIN_HEIGHT))),
        }
    }

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig::with_filter(self.log.clone())
    }

    pub fn initial_config(&self) -> GradientConfig {
        let mut config = GradientConfig::default();
        config.kind = self.kind;
        config.extend_mode = self.extend;
        config.dither = self.dither;
        config.set_parameter(self.parameter);
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_open_the_minimum_window() {
        let o = DemoOptions::try_parse_from(["gradients"]).expect("defaults parse");
        assert_eq!(o.renderer, RendererKind::Engine);
        assert_eq!(o.window_size(), (700, 650));
        assert_eq!(o.initial_config(), GradientConfig::default());
        assert_eq!(o.runtime_config().title, "Gradients Sample");
    }

    #[test]
    fn small_sizes_are_raised_to_minimum() {
        let o = DemoOptions::try_parse_from(["gradients", "--width", "300", "--height", "900"]).expect("parse");
        assert_eq!(o.window_size(), (700, 900));
    }

    #[test]
    fn gradient_flags_seed_initial_state() {
        let o = DemoOptions::try_parse_from([
            "gradients", "--kind", "conic", "--extend", "reflect", "--parameter", "360", "--dither", "--renderer", "reference",
        ])
        .expect("parse");
        let c = o.initial_config();
        assert_eq!(c.kind, GradientKind::Conic);
        assert_eq!(c.extend_mode, ExtendMode::Reflect);
        assert_eq!(c.parameter(), 360);
        assert!(c.dither);
        assert_eq!(o.renderer, RendererKind::Reference);
    }

    #[test]
    fn parameter_above_range_is_rejected() {
        assert!(DemoOptions::try_parse_from(["gradients", "--parameter", "721"]).is_err());
    }
}
