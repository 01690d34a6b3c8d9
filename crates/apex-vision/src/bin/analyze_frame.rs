//! CLI tool to classify a saved screenshot and dump every sample for calibration.
//! Usage: cargo run --features cli --bin analyze_frame -- <screenshot.png> <data_dir> [settings.json] [output_dir]

use anyhow::{bail, Context, Result};
use apex_capture::Frame;
use apex_data::{Profile, Settings};
use apex_vision::{detect_gray_bands, Catalog, Engine};
use std::path::PathBuf;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        bail!("Usage: {} <screenshot.png> <data_dir> [settings.json] [output_dir]", args[0]);
    }

    let input_path = PathBuf::from(&args[1]);
    let data_dir = PathBuf::from(&args[2]);
    let mut settings = match args.get(3) {
        Some(path) => Settings::load(&PathBuf::from(path))?,
        None => Settings::default(),
    };
    let output_dir = args
        .get(4)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("./debug_output"));
    let _ = std::fs::create_dir_all(&output_dir);

    // Report and dump on the one frame we have
    settings.debug = true;
    settings.debug_interval = 1;
    settings.debug_dir = Some(output_dir.clone());

    println!("Loading image: {}", input_path.display());
    let img = image::open(&input_path)
        .with_context(|| format!("Failed to open {}", input_path.display()))?
        .to_rgba8();
    let (w, h) = img.dimensions();
    println!("Image size: {}x{}", w, h);

    let Some(profile) = Profile::resolve(w, h, settings.language, settings.input_device) else {
        bail!("Unsupported resolution {}x{}", w, h);
    };
    println!("Profile: {}", profile);

    let frame = Frame::from_rgba_image(&img);

    println!("\n=== Regions ===");
    let catalog = Catalog::for_profile(profile);
    for (region, rect) in catalog.regions() {
        println!("  {:<22} {}", region.file_stem(), rect);
    }
    if let Some(band) = catalog.gray_band() {
        let bands = detect_gray_bands(&frame, band);
        println!(
            "  gray band: {} line(s), separation {} (want {})",
            bands.lines.len(),
            bands.separation,
            band.expected_separation
        );
    }

    let mut engine = Engine::new(settings, &data_dir)
        .with_context(|| format!("Failed to load templates from {}", data_dir.display()))?;
    let state = engine
        .evaluate(&frame)
        .context("Frame could not be classified")?;

    println!("\n=== Scores ===");
    for entry in engine.debug_state().scores() {
        println!("  {:<22} {:>+4} {:>8.2}", entry.label, entry.offset, entry.score);
    }

    println!("\n=== Overlay ===");
    for category in apex_state::Category::ALL {
        println!("  {:<10} {}", format!("{:?}", category), state.get(category));
    }

    println!("\nDebug images saved to: {}", output_dir.display());
    Ok(())
}
