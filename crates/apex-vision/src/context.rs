use apex_data::Settings;
use image::RgbImage;
use std::fmt::Write;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::templates::TemplateLibrary;

/// Score of one comparison, kept for the periodic debug report.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreEntry {
    pub label: String,
    pub offset: i32,
    pub score: f64,
}

/// Frame counter and calibration output, owned by the engine across frames.
#[derive(Debug, Clone, Default)]
pub struct DebugState {
    enabled: bool,
    interval: u64,
    dump_dir: Option<PathBuf>,
    frame_counter: u64,
    /// Whether the frame being evaluated is a reporting frame
    active: bool,
    scores: Vec<ScoreEntry>,
}

impl DebugState {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            enabled: settings.debug,
            interval: settings.debug_interval.max(1),
            dump_dir: settings.debug_dir.clone(),
            ..Self::default()
        }
    }

    /// Pick up a new debug toggle without resetting the frame counter.
    pub fn reconfigure(&mut self, settings: &Settings) {
        self.enabled = settings.debug;
        self.interval = settings.debug_interval.max(1);
        self.dump_dir = settings.debug_dir.clone();
    }

    /// Count a frame and decide whether it gets reported.
    pub fn begin_frame(&mut self) {
        self.frame_counter = self.frame_counter.wrapping_add(1);
        self.active = self.enabled && self.frame_counter.is_multiple_of(self.interval);
        self.scores.clear();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    pub fn scores(&self) -> &[ScoreEntry] {
        &self.scores
    }

    pub fn record(&mut self, label: &str, offset: i32, score: f64) {
        if self.active {
            self.scores.push(ScoreEntry {
                label: label.to_string(),
                offset,
                score,
            });
        }
    }

    /// Write a sample and the template it was compared with. The template
    /// goes next to the sample with a `_ref` suffix; without one, any older
    /// `_ref` file is removed.
    pub fn dump(&self, name: &str, sample: &RgbImage, template: Option<&RgbImage>) {
        if !self.active {
            return;
        }
        let Some(dir) = &self.dump_dir else {
            return;
        };
        if let Err(e) = std::fs::create_dir_all(dir) {
            warn!("Failed to create debug dir {}: {}", dir.display(), e);
            return;
        }

        if let Err(e) = sample.save(dir.join(format!("{}.png", name))) {
            warn!("Failed to dump sample {}: {}", name, e);
        }
        let ref_path = dir.join(format!("{}_ref.png", name));
        match template {
            Some(template) => {
                if let Err(e) = template.save(&ref_path) {
                    warn!("Failed to dump template {}: {}", name, e);
                }
            }
            // A reference from an earlier frame no longer belongs to this sample
            None => {
                if let Err(e) = std::fs::remove_file(&ref_path) {
                    if e.kind() != std::io::ErrorKind::NotFound {
                        warn!("Failed to remove stale template {}: {}", name, e);
                    }
                }
            }
        }
    }

    /// Log the scores gathered during a reporting frame.
    pub fn finish_frame(&mut self) {
        if !self.active || self.scores.is_empty() {
            return;
        }

        let mut report = String::new();
        for entry in &self.scores {
            let _ = write!(report, "\n  {:<24} {:>+4} {:>8.2}", entry.label, entry.offset, entry.score);
        }
        info!("Scores at frame {}:{}", self.frame_counter, report);
    }
}

/// Everything one evaluation needs, handed explicitly to every stage.
pub struct EvalContext<'a> {
    pub catalog: &'a Catalog,
    pub library: &'a TemplateLibrary,
    pub threshold: f64,
    pub debug: &'a mut DebugState,
}
