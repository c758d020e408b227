use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use gradia_demo::app::GradientsApp;
use gradia_demo::backend::ReferenceCanvas;
use gradia_demo::config::RendererKind;
use gradia_demo::controller::GradientDemoController;
use gradia_demo::options::DemoOptions;
use gradia_engine::device::GpuInit;
use gradia_engine::logging::init_logging;
use gradia_engine::text::{FontId, FontSystem};
use gradia_engine::window::Runtime;

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

fn main() -> Result<()> {
    let options = DemoOptions::parse();
    init_logging(options.logging_config());

    let config = options.initial_config();

    if let Some(path) = &options.snapshot {
        return snapshot(&options, path);
    }

    let mut fonts = FontSystem::new();
    let font = load_font(&mut fonts, options.font.as_deref());

    let controller = GradientDemoController::new(config, options.renderer, options.seed);
    let app = GradientsApp::new(controller, fonts, font);

    log::info!("starting with the {} renderer", options.renderer.label());
    Runtime::run(options.runtime_config(), GpuInit::default(), app)
}

/// Renders the initial configuration with the reference backend into a PNG.
fn snapshot(options: &DemoOptions, path: &Path) -> Result<()> {
    let (w, h) = options.window_size();
    let canvas = GradientsApp::canvas_rect(w as f32, h as f32);
    let (cw, ch) = (canvas.size.x as u32, canvas.size.y as u32);

    let mut controller = GradientDemoController::new(options.initial_config(), RendererKind::Reference, options.seed);
    controller.set_canvas_size(canvas.size);

    let mut target = ReferenceCanvas::new(cw, ch, 1.0);
    controller.render(&mut target);
    target
        .save_png(path)
        .with_context(|| format!("snapshot of {cw}x{ch} canvas failed"))
}

/// Loads `explicit` or the first system font found. Labels are skipped
/// without a font.
fn load_font(fonts: &mut FontSystem, explicit: Option<&Path>) -> Option<FontId> {
    if let Some(path) = explicit {
        match fonts.load_font_file(path) {
            Ok(id) => return Some(id),
            Err(e) => log::warn!("{e}; falling back to system fonts"),
        }
    }

    let found = SYSTEM_FONTS.iter().find_map(|p| fonts.load_font_file(p).ok());
    if found.is_none() {
        log::warn!("no usable font found; panel labels are hidden (use --font)");
    }
    found
}
