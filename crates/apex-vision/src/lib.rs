pub mod catalog;
mod character;
pub mod classifier;
mod context;
mod engine;
mod error;
pub mod gray_bands;
pub mod psnr;
pub mod templates;
mod policy;

pub use catalog::{Catalog, RegionId};
pub use character::{identify, CharacterMatch};
pub use classifier::{classify, classify_with_retry, region_score};
pub use context::{DebugState, EvalContext, ScoreEntry};
pub use engine::Engine;
pub use error::{Result, VisionError};
pub use gray_bands::{detect_gray_bands, GrayBand, GrayBands, GrayLine};
pub use policy::Policy;
pub use psnr::MAX_SCORE;
pub use templates::{CharacterTemplate, TemplateLibrary, TemplateStore};
