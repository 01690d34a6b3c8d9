use apex_data::roster::CHARACTERS;
use apex_data::{InputDevice, Language, Profile, ResolutionTier};
use image::RgbImage;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::catalog::{Catalog, RegionId};
use crate::error::{Result, VisionError};

/// Reference image of one roster character's banner.
#[derive(Debug, Clone)]
pub struct CharacterTemplate {
    pub id: String,
    pub image: RgbImage,
}

/// Reference images of one profile: one per catalog region plus the
/// character roster for the banner region.
#[derive(Debug, Clone)]
pub struct TemplateLibrary {
    profile: Profile,
    regions: HashMap<RegionId, RgbImage>,
    characters: Vec<CharacterTemplate>,
}

/// Directory holding the region templates of a profile.
pub fn profile_dir(data_dir: &Path, profile: Profile) -> PathBuf {
    data_dir
        .join("templates")
        .join(profile.tier.dir_name())
        .join(profile.device.dir_name())
        .join(profile.language.dir_name())
}

/// Directory holding the character banners of a resolution tier.
pub fn characters_dir(data_dir: &Path, tier: ResolutionTier) -> PathBuf {
    data_dir
        .join("templates")
        .join(tier.dir_name())
        .join("characters")
}

impl TemplateLibrary {
    /// Load all templates a catalog needs from the data directory.
    /// Expects:
    ///   - data_dir/templates/{tier}/{device}/{lang}/{region}.png
    ///   - data_dir/templates/{tier}/characters/{id}.png
    pub fn load(data_dir: &Path, catalog: &Catalog) -> Result<Self> {
        let profile = catalog.profile();
        let region_dir = profile_dir(data_dir, profile);
        let character_dir = characters_dir(data_dir, profile.tier);

        let mut regions = HashMap::new();
        for (region, _) in catalog.regions().filter(|(id, _)| !id.uses_roster()) {
            let path = region_dir.join(format!("{}.png", region.file_stem()));
            let image = load_template(&path, profile, region.file_stem())?;
            regions.insert(region, image);
        }

        let mut characters = Vec::with_capacity(CHARACTERS.len());
        for id in CHARACTERS {
            let path = character_dir.join(format!("{}.png", id));
            characters.push(CharacterTemplate {
                id: id.to_string(),
                image: load_template(&path, profile, id)?,
            });
        }

        let library = Self::from_images(catalog, regions, characters)?;
        info!(
            "Loaded {} region and {} character templates for {}",
            library.regions.len(),
            library.characters.len(),
            profile
        );
        Ok(library)
    }

    /// Build a library from images already in memory, checking them against the catalog.
    pub fn from_images(
        catalog: &Catalog,
        regions: HashMap<RegionId, RgbImage>,
        characters: Vec<CharacterTemplate>,
    ) -> Result<Self> {
        catalog.validate()?;
        let profile = catalog.profile();

        for (region, rect) in catalog.regions() {
            if region.uses_roster() {
                if characters.is_empty() {
                    return Err(VisionError::MissingTemplate {
                        profile,
                        name: "characters".to_string(),
                    });
                }
                for character in &characters {
                    check_size(profile, &character.id, (rect.w, rect.h), &character.image)?;
                }
                continue;
            }

            let image = regions.get(&region).ok_or_else(|| VisionError::MissingTemplate {
                profile,
                name: region.file_stem().to_string(),
            })?;
            check_size(profile, region.file_stem(), (rect.w, rect.h), image)?;
        }

        Ok(Self {
            profile,
            regions,
            characters,
        })
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn region(&self, region: RegionId) -> Option<&RgbImage> {
        self.regions.get(&region)
    }

    pub fn characters(&self) -> &[CharacterTemplate] {
        &self.characters
    }
}

fn check_size(profile: Profile, name: &str, expected: (u32, u32), image: &RgbImage) -> Result<()> {
    if image.dimensions() != expected {
        return Err(VisionError::TemplateSizeMismatch {
            profile,
            name: name.to_string(),
            expected,
            actual: image.dimensions(),
        });
    }
    Ok(())
}

fn load_template(path: &Path, profile: Profile, name: &str) -> Result<RgbImage> {
    if !path.exists() {
        debug!("Missing template {}", path.display());
        return Err(VisionError::MissingTemplate {
            profile,
            name: name.to_string(),
        });
    }
    let img = image::open(path).map_err(|source| VisionError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgb8())
}

/// Template libraries of both resolution tiers for one language and device.
///
/// Read-only once built; a settings change builds a fresh store.
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    libraries: HashMap<Profile, TemplateLibrary>,
}

impl TemplateStore {
    pub fn load(data_dir: &Path, language: Language, device: InputDevice) -> Result<Self> {
        let mut store = Self::default();
        for tier in ResolutionTier::ALL {
            let catalog = Catalog::for_profile(Profile::new(tier, language, device));
            store.insert(TemplateLibrary::load(data_dir, &catalog)?);
        }
        Ok(store)
    }

    pub fn from_libraries(libraries: impl IntoIterator<Item = TemplateLibrary>) -> Self {
        let mut store = Self::default();
        for library in libraries {
            store.insert(library);
        }
        store
    }

    pub fn insert(&mut self, library: TemplateLibrary) {
        self.libraries.insert(library.profile(), library);
    }

    pub fn get(&self, profile: &Profile) -> Option<&TemplateLibrary> {
        self.libraries.get(profile)
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn hd_keyboard() -> Catalog {
        Catalog::for_profile(Profile::new(
            ResolutionTier::Hd,
            Language::English,
            InputDevice::KeyboardMouse,
        ))
    }

    fn filled(catalog: &Catalog) -> (HashMap<RegionId, RgbImage>, Vec<CharacterTemplate>) {
        let mut regions = HashMap::new();
        let mut banner = (0, 0);
        for (region, rect) in catalog.regions() {
            if region.uses_roster() {
                banner = (rect.w, rect.h);
            } else {
                regions.insert(region, RgbImage::from_pixel(rect.w, rect.h, Rgb([200, 10, 10])));
            }
        }
        let characters = CHARACTERS
            .iter()
            .map(|id| CharacterTemplate {
                id: id.to_string(),
                image: RgbImage::new(banner.0, banner.1),
            })
            .collect();
        (regions, characters)
    }

    fn write_library(dir: &Path, catalog: &Catalog) {
        let (regions, characters) = filled(catalog);
        let region_dir = profile_dir(dir, catalog.profile());
        std::fs::create_dir_all(&region_dir).unwrap();
        for (region, image) in &regions {
            image.save(region_dir.join(format!("{}.png", region.file_stem()))).unwrap();
        }
        let character_dir = characters_dir(dir, catalog.profile().tier);
        std::fs::create_dir_all(&character_dir).unwrap();
        for character in &characters {
            character.image.save(character_dir.join(format!("{}.png", character.id))).unwrap();
        }
    }

    #[test]
    fn test_from_images_complete() {
        let catalog = hd_keyboard();
        let (regions, characters) = filled(&catalog);
        let library = TemplateLibrary::from_images(&catalog, regions, characters).unwrap();
        assert_eq!(library.characters().len(), CHARACTERS.len());
        assert!(library.region(RegionId::Looting).is_some());
        assert!(library.region(RegionId::MapIcon).is_none());
    }

    #[test]
    fn test_missing_region_rejected() {
        let catalog = hd_keyboard();
        let (mut regions, characters) = filled(&catalog);
        regions.remove(&RegionId::TacticalIcon);
        let err = TemplateLibrary::from_images(&catalog, regions, characters).unwrap_err();
        assert!(matches!(err, VisionError::MissingTemplate { ref name, .. } if name == "tactical_icon"));
    }

    #[test]
    fn test_wrong_size_rejected() {
        let catalog = hd_keyboard();
        let (mut regions, characters) = filled(&catalog);
        regions.insert(RegionId::Looting, RgbImage::new(36, 15));
        let err = TemplateLibrary::from_images(&catalog, regions, characters).unwrap_err();
        assert!(matches!(
            err,
            VisionError::TemplateSizeMismatch {
                expected: (37, 15),
                actual: (36, 15),
                ..
            }
        ));
    }

    #[test]
    fn test_wrong_character_size_rejected() {
        let catalog = hd_keyboard();
        let (regions, mut characters) = filled(&catalog);
        characters[3].image = RgbImage::new(10, 10);
        let err = TemplateLibrary::from_images(&catalog, regions, characters).unwrap_err();
        assert!(matches!(err, VisionError::TemplateSizeMismatch { ref name, .. } if name == "gibraltar"));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = hd_keyboard();
        write_library(dir.path(), &catalog);

        let library = TemplateLibrary::load(dir.path(), &catalog).unwrap();
        assert_eq!(library.profile(), catalog.profile());
        assert_eq!(library.region(RegionId::Map).unwrap().get_pixel(0, 0).0, [200, 10, 10]);
        assert_eq!(library.characters()[5].id, "mirage");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = hd_keyboard();
        write_library(dir.path(), &catalog);
        std::fs::remove_file(characters_dir(dir.path(), ResolutionTier::Hd).join("wraith.png")).unwrap();

        let err = TemplateLibrary::load(dir.path(), &catalog).unwrap_err();
        assert!(matches!(err, VisionError::MissingTemplate { ref name, .. } if name == "wraith"));
    }

    #[test]
    fn test_store_loads_both_tiers() {
        let dir = tempfile::tempdir().unwrap();
        for tier in ResolutionTier::ALL {
            let catalog = Catalog::for_profile(Profile::new(tier, Language::German, InputDevice::Gamepad));
            write_library(dir.path(), &catalog);
        }

        let store = TemplateStore::load(dir.path(), Language::German, InputDevice::Gamepad).unwrap();
        assert_eq!(store.len(), 2);
        let qhd = Profile::new(ResolutionTier::Qhd, Language::German, InputDevice::Gamepad);
        assert!(store.get(&qhd).is_some());
        let other = Profile::new(ResolutionTier::Qhd, Language::English, InputDevice::Gamepad);
        assert!(store.get(&other).is_none());
    }
}
