use apex_capture::{sample, Frame, Rect};
use image::RgbImage;
use tracing::warn;

use crate::catalog::RegionId;
use crate::context::{DebugState, EvalContext};
use crate::error::Result;
use crate::psnr;

/// Similarity between the frame at `rect` (shifted by `x_offset`) and `template`.
pub fn region_score(frame: &Frame<'_>, rect: &Rect, template: &RgbImage, x_offset: i32) -> Result<f64> {
    let crop = sample(frame, rect, x_offset)?;
    Ok(psnr::score(&crop, template))
}

/// Whether `template` is on screen at `rect`. The score has to be strictly
/// above the threshold. A region that cannot be sampled is not on screen.
pub fn classify(
    frame: &Frame<'_>,
    rect: &Rect,
    template: &RgbImage,
    threshold: f64,
    x_offset: i32,
) -> bool {
    classify_observed(frame, rect, template, threshold, x_offset, |_, _| {})
}

/// [`classify`] at the nominal position and at `jitter_offset`; either one is enough.
pub fn classify_with_retry(
    frame: &Frame<'_>,
    rect: &Rect,
    template: &RgbImage,
    threshold: f64,
    jitter_offset: i32,
) -> bool {
    retry_observed(frame, rect, template, threshold, jitter_offset, |_, _, _| {})
}

/// [`classify`], handing the sample and its score to `observe` before the verdict.
fn classify_observed(
    frame: &Frame<'_>,
    rect: &Rect,
    template: &RgbImage,
    threshold: f64,
    x_offset: i32,
    mut observe: impl FnMut(&RgbImage, f64),
) -> bool {
    let crop = match sample(frame, rect, x_offset) {
        Ok(crop) => crop,
        Err(e) => {
            warn!("Skipping region: {}", e);
            return false;
        }
    };
    let score = psnr::score(&crop, template);
    observe(&crop, score);
    score > threshold
}

/// Both attempts always run so an observer sees both scores.
fn retry_observed(
    frame: &Frame<'_>,
    rect: &Rect,
    template: &RgbImage,
    threshold: f64,
    jitter_offset: i32,
    mut observe: impl FnMut(i32, &RgbImage, f64),
) -> bool {
    let nominal = classify_observed(frame, rect, template, threshold, 0, |crop, score| observe(0, crop, score));
    let shifted = classify_observed(frame, rect, template, threshold, jitter_offset, |crop, score| {
        observe(jitter_offset, crop, score)
    });
    nominal || shifted
}

fn report(debug: &mut DebugState, region: RegionId, x_offset: i32, crop: &RgbImage, template: &RgbImage, score: f64) {
    debug.record(region.file_stem(), x_offset, score);
    if x_offset == 0 {
        debug.dump(region.file_stem(), crop, Some(template));
    }
}

/// Rect and template of a catalog region in the active profile.
fn lookup<'a>(ctx: &EvalContext<'a>, region: RegionId) -> Option<(Rect, &'a RgbImage)> {
    let library = ctx.library;
    match (ctx.catalog.rect(region), library.region(region)) {
        (Some(rect), Some(template)) => Some((rect, template)),
        _ => {
            warn!("No {} region in {}", region, ctx.catalog.profile());
            None
        }
    }
}

pub(crate) fn region_visible(ctx: &mut EvalContext<'_>, frame: &Frame<'_>, region: RegionId) -> bool {
    let Some((rect, template)) = lookup(ctx, region) else {
        return false;
    };
    let threshold = ctx.threshold;
    let debug = &mut *ctx.debug;
    classify_observed(frame, &rect, template, threshold, 0, |crop, score| {
        report(debug, region, 0, crop, template, score)
    })
}

/// Offset-retry variant of [`region_visible`].
pub(crate) fn region_visible_with_retry(
    ctx: &mut EvalContext<'_>,
    frame: &Frame<'_>,
    region: RegionId,
) -> bool {
    let Some((rect, template)) = lookup(ctx, region) else {
        return false;
    };
    let (threshold, offset) = (ctx.threshold, ctx.catalog.jitter_offset());
    let debug = &mut *ctx.debug;
    retry_observed(frame, &rect, template, threshold, offset, |x_offset, crop, score| {
        report(debug, region, x_offset, crop, template, score)
    })
}
