use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported capture resolutions. Anything else has no catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionTier {
    /// 1920x1080
    #[serde(rename = "1080p")]
    Hd,
    /// 2560x1440
    #[serde(rename = "1440p")]
    Qhd,
}

impl ResolutionTier {
    pub const ALL: [ResolutionTier; 2] = [ResolutionTier::Hd, ResolutionTier::Qhd];

    pub fn from_dimensions(width: u32, height: u32) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.dimensions() == (width, height))
    }

    pub const fn dimensions(self) -> (u32, u32) {
        match self {
            ResolutionTier::Hd => (1920, 1080),
            ResolutionTier::Qhd => (2560, 1440),
        }
    }

    /// Directory name used for this tier's templates.
    pub const fn dir_name(self) -> &'static str {
        match self {
            ResolutionTier::Hd => "1080p",
            ResolutionTier::Qhd => "1440p",
        }
    }
}

/// Game client language. Text-bearing HUD elements differ per language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ru")]
    Russian,
    #[serde(rename = "de")]
    German,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::Russian, Language::German];

    pub const fn dir_name(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Russian => "ru",
            Language::German => "de",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InputDevice {
    #[default]
    #[serde(rename = "keyboard")]
    KeyboardMouse,
    #[serde(rename = "gamepad")]
    Gamepad,
}

impl InputDevice {
    pub const ALL: [InputDevice; 2] = [InputDevice::KeyboardMouse, InputDevice::Gamepad];

    pub const fn dir_name(self) -> &'static str {
        match self {
            InputDevice::KeyboardMouse => "keyboard",
            InputDevice::Gamepad => "gamepad",
        }
    }
}

/// Selects exactly one region catalog and one template library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Profile {
    pub tier: ResolutionTier,
    pub language: Language,
    pub device: InputDevice,
}

impl Profile {
    pub const fn new(tier: ResolutionTier, language: Language, device: InputDevice) -> Self {
        Self {
            tier,
            language,
            device,
        }
    }

    /// Profile for a frame of the given size, or `None` for unsupported sizes.
    pub fn resolve(width: u32, height: u32, language: Language, device: InputDevice) -> Option<Self> {
        ResolutionTier::from_dimensions(width, height).map(|tier| Self::new(tier, language, device))
    }

    /// Every supported combination.
    pub fn all() -> impl Iterator<Item = Profile> {
        ResolutionTier::ALL.into_iter().flat_map(|tier| {
            Language::ALL.into_iter().flat_map(move |language| {
                InputDevice::ALL
                    .into_iter()
                    .map(move |device| Profile::new(tier, language, device))
            })
        })
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.tier.dir_name(),
            self.device.dir_name(),
            self.language.dir_name()
        )
    }
}
