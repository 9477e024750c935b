//! # Headless Snapshot
//!
//! Renders two seconds of the field on the CPU and writes the last frame to
//! `backdrop.png`, composited at half opacity over the navy page colour.
//! Also prints how many links were live in that frame.
//!
//! Run with: `cargo run --example headless_snapshot`

use backdrop::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<(), BackdropError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let viewport = Viewport::new(1280, 720);
    let config = FieldConfig::default();
    let opacity = config.layer_opacity;

    let frame = render_headless(
        viewport,
        120,
        config.clone(),
        Some(SparkConfig::default()),
        StdRng::seed_from_u64(2024),
    )?;
    frame.save_png("backdrop.png", Rgba::NAVY, opacity)?;

    // Same seed, replayed on a recorder to count what was drawn.
    let mut backdrop = Backdrop::mount(
        Some(Recorder::new()),
        viewport,
        config,
        StdRng::seed_from_u64(2024),
    )?;
    for _ in 0..120 {
        backdrop.tick();
    }
    if let Some(recorder) = backdrop.surface() {
        println!(
            "{} particles, {} link strokes in the last frame",
            backdrop.field().particles().len(),
            recorder.lines().count()
        );
    }
    Ok(())
}
