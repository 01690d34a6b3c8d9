mod profile;
pub mod roster;
mod settings;

pub use profile::{InputDevice, Language, Profile, ResolutionTier};
pub use settings::{Settings, DEFAULT_DEBUG_INTERVAL, DEFAULT_THRESHOLD};
