//! Synthetic frames and template sets shared by the integration tests.

#![allow(dead_code)]

use apex_capture::Rect;
use apex_data::roster::CHARACTERS;
use apex_data::{InputDevice, Language, Profile, ResolutionTier, Settings};
use apex_vision::templates::{characters_dir, profile_dir};
use apex_vision::{Catalog, CharacterTemplate, Engine, RegionId, TemplateLibrary, TemplateStore};
use image::{Rgb, RgbImage, Rgba, RgbaImage};
use std::collections::HashMap;
use std::path::Path;

pub const HD_EN_KEYBOARD: Profile = Profile::new(ResolutionTier::Hd, Language::English, InputDevice::KeyboardMouse);
pub const HD_EN_GAMEPAD: Profile = Profile::new(ResolutionTier::Hd, Language::English, InputDevice::Gamepad);
pub const QHD_EN_KEYBOARD: Profile = Profile::new(ResolutionTier::Qhd, Language::English, InputDevice::KeyboardMouse);

/// Bright, busy pattern; different seeds never come close to each other or to black.
pub fn pattern(w: u32, h: u32, seed: u32) -> RgbImage {
    RgbImage::from_fn(w, h, |x, y| {
        Rgb([
            (64 + (x * 7 + y * 13 + seed * 31) % 192) as u8,
            (64 + (x * 11 + seed * 47) % 192) as u8,
            (64 + (y * 5 + seed * 59) % 192) as u8,
        ])
    })
}

pub fn character_seed(index: usize) -> u32 {
    100 + index as u32
}

pub fn region_seed(region: RegionId) -> u32 {
    region as u32 + 1
}

pub fn library(profile: Profile) -> TemplateLibrary {
    let catalog = Catalog::for_profile(profile);
    let mut regions = HashMap::new();
    let mut banner = Rect::new(0, 0, 0, 0);

    for (region, rect) in catalog.regions() {
        if region.uses_roster() {
            banner = rect;
        } else {
            regions.insert(region, pattern(rect.w, rect.h, region_seed(region)));
        }
    }

    let characters = CHARACTERS
        .iter()
        .enumerate()
        .map(|(i, id)| CharacterTemplate {
            id: id.to_string(),
            image: pattern(banner.w, banner.h, character_seed(i)),
        })
        .collect();

    TemplateLibrary::from_images(&catalog, regions, characters).unwrap()
}

pub fn engine(profiles: &[Profile], settings: Settings) -> Engine {
    let store = TemplateStore::from_libraries(profiles.iter().map(|p| library(*p)));
    Engine::with_store(settings, store)
}

pub fn settings_for(profile: Profile) -> Settings {
    Settings {
        language: profile.language,
        input_device: profile.device,
        ..Settings::default()
    }
}

pub fn black_frame(tier: ResolutionTier) -> RgbaImage {
    let (w, h) = tier.dimensions();
    RgbaImage::from_pixel(w, h, Rgba([0, 0, 0, 255]))
}

/// Draw `img` into the frame at the region's rectangle, moved by `x_offset`.
pub fn paste(frame: &mut RgbaImage, rect: Rect, x_offset: i32, img: &RgbImage) {
    let origin = rect.shifted(x_offset).unwrap();
    for (x, y, px) in img.enumerate_pixels() {
        frame.put_pixel(origin.x + x, origin.y + y, Rgba([px[0], px[1], px[2], 255]));
    }
}

/// Put a region's own template on screen.
pub fn show_region(frame: &mut RgbaImage, profile: Profile, region: RegionId, x_offset: i32) {
    let catalog = Catalog::for_profile(profile);
    let rect = catalog.rect(region).unwrap();
    paste(frame, rect, x_offset, &pattern(rect.w, rect.h, region_seed(region)));
}

pub fn show_character(frame: &mut RgbaImage, profile: Profile, index: usize) {
    let catalog = Catalog::for_profile(profile);
    let rect = catalog.rect(RegionId::CharacterBanner).unwrap();
    paste(frame, rect, 0, &pattern(rect.w, rect.h, character_seed(index)));
}

/// Two gray separator lines in the profile's band, `separation` rows apart.
pub fn draw_gray_lines(frame: &mut RgbaImage, profile: Profile, separation: u32) {
    let catalog = Catalog::for_profile(profile);
    let band = *catalog.gray_band().unwrap();
    let lower = band.bottom - 10;
    for y in [lower, lower - separation] {
        for x in band.x..band.x + band.width / 2 {
            frame.put_pixel(x, y, Rgba([117, 119, 118, 255]));
        }
    }
}

/// Write a full template set for `profile` in the on-disk layout.
pub fn write_templates(dir: &Path, profile: Profile) {
    let lib = library(profile);
    let region_dir = profile_dir(dir, profile);
    std::fs::create_dir_all(&region_dir).unwrap();
    for (region, _) in Catalog::for_profile(profile).regions() {
        if let Some(img) = lib.region(region) {
            img.save(region_dir.join(format!("{}.png", region.file_stem()))).unwrap();
        }
    }

    let character_dir = characters_dir(dir, profile.tier);
    std::fs::create_dir_all(&character_dir).unwrap();
    for character in lib.characters() {
        character.image.save(character_dir.join(format!("{}.png", character.id))).unwrap();
    }
}
