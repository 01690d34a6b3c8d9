use apex_capture::{Rect, SampleError};
use apex_data::Profile;
use std::path::PathBuf;
use thiserror::Error;

use crate::catalog::RegionId;

#[derive(Debug, Error)]
pub enum VisionError {
    #[error("Unsupported frame size {width}x{height}")]
    UnsupportedResolution { width: u32, height: u32 },

    #[error("Region {region} at {rect} lies outside the {profile} frame")]
    OutOfBounds {
        profile: Profile,
        region: RegionId,
        rect: Rect,
    },

    #[error("Gray band of {profile} lies outside the frame")]
    GrayBandOutOfBounds { profile: Profile },

    #[error("Missing template {name} for {profile}")]
    MissingTemplate { profile: Profile, name: String },

    #[error("Template {name} for {profile} is {}x{}, expected {}x{}", .actual.0, .actual.1, .expected.0, .expected.1)]
    TemplateSizeMismatch {
        profile: Profile,
        name: String,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("No template directory to load other templates from")]
    NoTemplateDir,

    #[error("Failed to load template {}", .path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Sample(#[from] SampleError),
}

pub type Result<T> = std::result::Result<T, VisionError>;
