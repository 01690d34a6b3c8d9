use apex_capture::{sample, Frame, Rect};
use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::RegionId;
use crate::context::EvalContext;
use crate::psnr;
use crate::templates::CharacterTemplate;

/// Character recognized on the player banner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterMatch {
    pub index: usize,
    pub character_id: String,
    pub score: f64,
}

/// Index of the first template, in roster order, that is on screen at `rect`.
///
/// The region is sampled once; the scan stops at the first score above the
/// threshold, so an earlier template wins over a later one that matches too.
pub fn identify(
    frame: &Frame<'_>,
    rect: &Rect,
    templates: &[CharacterTemplate],
    threshold: f64,
) -> Option<usize> {
    let crop = sample_banner(frame, rect)?;
    scan(&crop, templates, threshold, |_, _| {})
}

fn sample_banner(frame: &Frame<'_>, rect: &Rect) -> Option<RgbImage> {
    match sample(frame, rect, 0) {
        Ok(crop) => Some(crop),
        Err(e) => {
            warn!("Skipping character banner: {}", e);
            None
        }
    }
}

fn scan(
    crop: &RgbImage,
    templates: &[CharacterTemplate],
    threshold: f64,
    mut observe: impl FnMut(&CharacterTemplate, f64),
) -> Option<usize> {
    templates.iter().position(|tmpl| {
        let score = psnr::score(crop, &tmpl.image);
        observe(tmpl, score);
        score > threshold
    })
}

/// Banner identification for the active profile, reporting every score on
/// debug frames.
pub(crate) fn identify_banner(ctx: &mut EvalContext<'_>, frame: &Frame<'_>) -> Option<CharacterMatch> {
    let rect = ctx.catalog.rect(RegionId::CharacterBanner)?;
    let crop = sample_banner(frame, &rect)?;

    let library = ctx.library;
    let characters = library.characters();
    let debug = &mut *ctx.debug;
    let mut last_score = 0.0;
    let found = scan(&crop, characters, ctx.threshold, |tmpl, score| {
        debug.record(&tmpl.id, 0, score);
        last_score = score;
    })
    .map(|index| CharacterMatch {
        index,
        character_id: characters[index].id.clone(),
        score: last_score,
    });

    let name = RegionId::CharacterBanner.file_stem();
    match &found {
        Some(m) => {
            debug!("Banner shows {} ({:.1} dB)", m.character_id, m.score);
            ctx.debug.dump(name, &crop, Some(&characters[m.index].image));
        }
        None => ctx.debug.dump(name, &crop, None),
    }

    found
}
