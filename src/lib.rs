mod pipeline;

pub use pipeline::Pipeline;

use anyhow::{Context, Result};
use apex_data::Settings;
use apex_state::OverlayState;
use apex_vision::Engine;
use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "apex_overlay=debug,apex_vision=info,apex_data=info".into()),
        )
        .init();
}

/// Resolve the data directory holding `templates/`
pub fn resolve_data_dir() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()));
    if let Some(dir) = exe_dir {
        // target/<profile>/<exe> during development
        for candidate in dir.ancestors().take(3) {
            let data = candidate.join("data");
            if data.join("templates").exists() {
                return data;
            }
        }
    }
    PathBuf::from("data")
}

/// Load settings and templates, then start classifying frames from `frame_rx`.
///
/// The returned sender feeds settings changes to the running pipeline.
pub fn launch(
    data_dir: &Path,
    settings_path: &Path,
    frame_rx: watch::Receiver<Option<Arc<RgbaImage>>>,
) -> Result<(Pipeline, watch::Sender<Settings>)> {
    tracing::info!("Data directory: {}", data_dir.display());
    let settings = Settings::load(settings_path)?;
    let engine = Engine::new(settings.clone(), data_dir)
        .with_context(|| format!("Failed to load templates from {}", data_dir.display()))?;

    let (settings_tx, settings_rx) = watch::channel(settings);
    let pipeline = Pipeline::start(engine, frame_rx, settings_rx);
    Ok((pipeline, settings_tx))
}

/// Overlay state as reported to the actuator, `null` before the first classified frame.
pub fn status_json(state: Option<OverlayState>) -> serde_json::Value {
    match state {
        Some(state) => serde_json::json!({
            "game": state.game,
            "looting": state.looting,
            "inventory": state.inventory,
            "map": state.map,
            "spectate": state.spectate,
            "visible": state.visible().collect::<Vec<_>>(),
        }),
        None => serde_json::Value::Null,
    }
}
