use apex_capture::Rect;
use apex_data::{InputDevice, Language, Profile, ResolutionTier};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, VisionError};
use crate::gray_bands::GrayBand;

/// Named HUD element watched by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionId {
    Looting,
    Map,
    InventoryPrimary,
    InventorySecondary,
    CharacterBanner,
    MapIcon,
    GrenadeIcon,
    TacticalIcon,
    SpectateRed,
    SpectateBlue,
    SpectateGreen,
    SpectateYellow,
}

impl RegionId {
    /// Spectator badge colours, all sharing one rectangle.
    pub const SPECTATE: [RegionId; 4] = [
        RegionId::SpectateRed,
        RegionId::SpectateBlue,
        RegionId::SpectateGreen,
        RegionId::SpectateYellow,
    ];

    /// Name of the template file (without extension) and of debug dumps.
    pub const fn file_stem(self) -> &'static str {
        match self {
            RegionId::Looting => "looting",
            RegionId::Map => "map",
            RegionId::InventoryPrimary => "inventory",
            RegionId::InventorySecondary => "inventory_secondary",
            RegionId::CharacterBanner => "character_banner",
            RegionId::MapIcon => "map_icon",
            RegionId::GrenadeIcon => "grenade_icon",
            RegionId::TacticalIcon => "tactical_icon",
            RegionId::SpectateRed => "spectate_red",
            RegionId::SpectateBlue => "spectate_blue",
            RegionId::SpectateGreen => "spectate_green",
            RegionId::SpectateYellow => "spectate_yellow",
        }
    }

    /// Regions whose position wobbles and get a second look at the jitter offset.
    pub const fn has_jitter(self) -> bool {
        matches!(self, RegionId::Looting | RegionId::Map)
    }

    /// The banner region is matched against the character roster instead of
    /// a single template.
    pub const fn uses_roster(self) -> bool {
        matches!(self, RegionId::CharacterBanner)
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

/// One table row: the region's rectangle for English, Russian and German clients.
struct RegionRow {
    region: RegionId,
    rects: [Rect; 3],
}

/// Static layout of one resolution tier and input device.
struct Layout {
    rows: &'static [RegionRow],
    jitter_offset: i32,
    gray_band: Option<GrayBand>,
}

const fn r(x: u32, y: u32, w: u32, h: u32) -> Rect {
    Rect::new(x, y, w, h)
}

/// Row for a region that looks the same in every language.
const fn same(region: RegionId, rect: Rect) -> RegionRow {
    RegionRow {
        region,
        rects: [rect, rect, rect],
    }
}

const fn per_language(region: RegionId, en: Rect, ru: Rect, de: Rect) -> RegionRow {
    RegionRow {
        region,
        rects: [en, ru, de],
    }
}

const HD_SPECTATE: Rect = r(880, 86, 160, 20);
const QHD_SPECTATE: Rect = r(1173, 115, 213, 27);

static HD_KEYBOARD: Layout = Layout {
    rows: &[
        per_language(RegionId::Looting, r(530, 971, 37, 15), r(524, 971, 49, 15), r(527, 971, 43, 15)),
        same(RegionId::Map, r(62, 1036, 24, 24)),
        per_language(RegionId::InventoryPrimary, r(118, 32, 96, 18), r(118, 32, 112, 18), r(118, 32, 104, 18)),
        per_language(RegionId::InventorySecondary, r(690, 140, 80, 16), r(690, 140, 92, 16), r(690, 140, 88, 16)),
        same(RegionId::CharacterBanner, r(38, 940, 56, 56)),
        same(RegionId::GrenadeIcon, r(1590, 1012, 28, 28)),
        same(RegionId::TacticalIcon, r(900, 1000, 36, 36)),
        same(RegionId::SpectateRed, HD_SPECTATE),
        same(RegionId::SpectateBlue, HD_SPECTATE),
        same(RegionId::SpectateGreen, HD_SPECTATE),
        same(RegionId::SpectateYellow, HD_SPECTATE),
    ],
    jitter_offset: 7,
    gray_band: None,
};

static HD_GAMEPAD: Layout = Layout {
    rows: &[
        per_language(RegionId::Looting, r(514, 968, 52, 20), r(508, 968, 64, 20), r(511, 968, 58, 20)),
        same(RegionId::Map, r(58, 1032, 30, 30)),
        per_language(RegionId::InventoryPrimary, r(96, 30, 120, 22), r(96, 30, 136, 22), r(96, 30, 128, 22)),
        same(RegionId::CharacterBanner, r(38, 940, 56, 56)),
        same(RegionId::MapIcon, r(1800, 40, 24, 24)),
        same(RegionId::SpectateRed, HD_SPECTATE),
        same(RegionId::SpectateBlue, HD_SPECTATE),
        same(RegionId::SpectateGreen, HD_SPECTATE),
        same(RegionId::SpectateYellow, HD_SPECTATE),
    ],
    jitter_offset: -12,
    gray_band: Some(GrayBand {
        x: 1240,
        width: 220,
        top: 560,
        bottom: 700,
        expected_separation: 27,
    }),
};

static QHD_KEYBOARD: Layout = Layout {
    rows: &[
        per_language(RegionId::Looting, r(707, 1295, 49, 20), r(699, 1295, 65, 20), r(703, 1295, 57, 20)),
        same(RegionId::Map, r(83, 1381, 32, 32)),
        per_language(RegionId::InventoryPrimary, r(157, 43, 128, 24), r(157, 43, 149, 24), r(157, 43, 139, 24)),
        per_language(RegionId::InventorySecondary, r(920, 187, 107, 21), r(920, 187, 123, 21), r(920, 187, 117, 21)),
        same(RegionId::CharacterBanner, r(51, 1253, 75, 75)),
        same(RegionId::GrenadeIcon, r(2120, 1349, 37, 37)),
        same(RegionId::TacticalIcon, r(1200, 1333, 48, 48)),
        same(RegionId::SpectateRed, QHD_SPECTATE),
        same(RegionId::SpectateBlue, QHD_SPECTATE),
        same(RegionId::SpectateGreen, QHD_SPECTATE),
        same(RegionId::SpectateYellow, QHD_SPECTATE),
    ],
    jitter_offset: 9,
    gray_band: None,
};

static QHD_GAMEPAD: Layout = Layout {
    rows: &[
        per_language(RegionId::Looting, r(685, 1291, 69, 27), r(677, 1291, 85, 27), r(681, 1291, 77, 27)),
        same(RegionId::Map, r(77, 1376, 40, 40)),
        per_language(RegionId::InventoryPrimary, r(128, 40, 160, 29), r(128, 40, 181, 29), r(128, 40, 171, 29)),
        same(RegionId::CharacterBanner, r(51, 1253, 75, 75)),
        same(RegionId::MapIcon, r(2400, 53, 32, 32)),
        same(RegionId::SpectateRed, QHD_SPECTATE),
        same(RegionId::SpectateBlue, QHD_SPECTATE),
        same(RegionId::SpectateGreen, QHD_SPECTATE),
        same(RegionId::SpectateYellow, QHD_SPECTATE),
    ],
    jitter_offset: -16,
    gray_band: Some(GrayBand {
        x: 1653,
        width: 293,
        top: 747,
        bottom: 933,
        expected_separation: 36,
    }),
};

fn layout(tier: ResolutionTier, device: InputDevice) -> &'static Layout {
    match (tier, device) {
        (ResolutionTier::Hd, InputDevice::KeyboardMouse) => &HD_KEYBOARD,
        (ResolutionTier::Hd, InputDevice::Gamepad) => &HD_GAMEPAD,
        (ResolutionTier::Qhd, InputDevice::KeyboardMouse) => &QHD_KEYBOARD,
        (ResolutionTier::Qhd, InputDevice::Gamepad) => &QHD_GAMEPAD,
    }
}

const fn language_column(language: Language) -> usize {
    match language {
        Language::English => 0,
        Language::Russian => 1,
        Language::German => 2,
    }
}

/// Regions, jitter offset and gray band of one profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    profile: Profile,
    regions: Vec<(RegionId, Rect)>,
    jitter_offset: i32,
    gray_band: Option<GrayBand>,
}

impl Catalog {
    pub fn for_profile(profile: Profile) -> Self {
        let layout = layout(profile.tier, profile.device);
        let column = language_column(profile.language);

        Self {
            profile,
            regions: layout
                .rows
                .iter()
                .map(|row| (row.region, row.rects[column]))
                .collect(),
            jitter_offset: layout.jitter_offset,
            gray_band: layout.gray_band,
        }
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn rect(&self, region: RegionId) -> Option<Rect> {
        self.regions
            .iter()
            .find(|(id, _)| *id == region)
            .map(|(_, rect)| *rect)
    }

    pub fn regions(&self) -> impl Iterator<Item = (RegionId, Rect)> + '_ {
        self.regions.iter().copied()
    }

    /// Horizontal offset of the second attempt for jittering regions.
    pub fn jitter_offset(&self) -> i32 {
        self.jitter_offset
    }

    pub fn gray_band(&self) -> Option<&GrayBand> {
        self.gray_band.as_ref()
    }

    /// Check every rectangle, including its jittered copy, against the frame size.
    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.profile.tier.dimensions();

        for (region, rect) in self.regions() {
            let shifted = if region.has_jitter() {
                rect.shifted(self.jitter_offset)
            } else {
                Some(rect)
            };
            let in_bounds = rect.fits_within(width, height)
                && shifted.is_some_and(|s| s.fits_within(width, height));
            if !in_bounds {
                return Err(VisionError::OutOfBounds {
                    profile: self.profile,
                    region,
                    rect,
                });
            }
        }

        if let Some(band) = &self.gray_band {
            if !band.fits_within(width, height) {
                return Err(VisionError::GrayBandOutOfBounds {
                    profile: self.profile,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_profile_in_bounds() {
        for profile in Profile::all() {
            let catalog = Catalog::for_profile(profile);
            catalog
                .validate()
                .unwrap_or_else(|e| panic!("{}: {}", profile, e));
        }
    }

    #[test]
    fn test_region_sets_per_device() {
        for profile in Profile::all() {
            let catalog = Catalog::for_profile(profile);
            let has = |region| catalog.rect(region).is_some();

            for region in [RegionId::Looting, RegionId::Map, RegionId::InventoryPrimary, RegionId::CharacterBanner] {
                assert!(has(region), "{} lacks {}", profile, region);
            }
            for region in RegionId::SPECTATE {
                assert!(has(region), "{} lacks {}", profile, region);
            }

            match profile.device {
                InputDevice::KeyboardMouse => {
                    assert!(has(RegionId::InventorySecondary));
                    assert!(has(RegionId::GrenadeIcon));
                    assert!(has(RegionId::TacticalIcon));
                    assert!(catalog.gray_band().is_none());
                }
                InputDevice::Gamepad => {
                    assert!(has(RegionId::MapIcon));
                    assert!(!has(RegionId::InventorySecondary));
                    assert!(catalog.gray_band().is_some());
                }
            }
        }
    }

    #[test]
    fn test_jitter_offsets_distinct() {
        let offsets: std::collections::HashSet<i32> = Profile::all()
            .map(|p| Catalog::for_profile(p).jitter_offset())
            .collect();
        assert_eq!(offsets.len(), 4);
        assert!(!offsets.contains(&0));
    }

    #[test]
    fn test_language_columns() {
        let en = Catalog::for_profile(Profile::new(ResolutionTier::Hd, Language::English, InputDevice::KeyboardMouse));
        let ru = Catalog::for_profile(Profile::new(ResolutionTier::Hd, Language::Russian, InputDevice::KeyboardMouse));
        assert_eq!(en.rect(RegionId::Looting), Some(Rect::new(530, 971, 37, 15)));
        assert_eq!(ru.rect(RegionId::Looting), Some(Rect::new(524, 971, 49, 15)));
        assert_eq!(en.rect(RegionId::Map), ru.rect(RegionId::Map));
    }

    #[test]
    fn test_regions_unique() {
        for profile in Profile::all() {
            let catalog = Catalog::for_profile(profile);
            let ids: std::collections::HashSet<_> = catalog.regions().map(|(id, _)| id).collect();
            assert_eq!(ids.len(), catalog.regions().count());
        }
    }
}
