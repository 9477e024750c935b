//! # Hero Backdrop
//!
//! The landing-page look in a native window: cyan particles joined by faint
//! lines over a navy page, with the rising sparks on top.
//!
//! - Resize the window to re-seed the field for the new size
//! - Close the window to tear the backdrop down
//!
//! Run with: `cargo run --example window`

use backdrop::prelude::*;

fn main() -> Result<(), BackdropError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = WindowOptions::default()
        .with_title("backdrop - hero")
        .with_size(1280, 720)
        .with_field(FieldConfig::default().with_neighbor_search(NeighborSearch::Grid))
        .with_sparks(Some(SparkConfig::default()));

    backdrop::run(options)
}
