use apex_capture::Frame;
use apex_data::InputDevice;
use apex_state::OverlayState;
use tracing::debug;

use crate::catalog::RegionId;
use crate::character::identify_banner;
use crate::classifier::{region_visible, region_visible_with_retry};
use crate::context::EvalContext;
use crate::gray_bands::detect_gray_bands;

/// How region verdicts combine into overlay categories. The two HUD layouts
/// differ in how the inventory is confirmed and which icons prove a match is
/// running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    KeyboardMouse,
    Gamepad,
}

impl Policy {
    pub fn for_device(device: InputDevice) -> Self {
        match device {
            InputDevice::KeyboardMouse => Policy::KeyboardMouse,
            InputDevice::Gamepad => Policy::Gamepad,
        }
    }

    pub fn evaluate(&self, ctx: &mut EvalContext<'_>, frame: &Frame<'_>) -> OverlayState {
        OverlayState {
            game: self.game(ctx, frame),
            looting: region_visible_with_retry(ctx, frame, RegionId::Looting),
            inventory: self.inventory(ctx, frame),
            map: region_visible_with_retry(ctx, frame, RegionId::Map),
            spectate: spectate(ctx, frame),
        }
    }

    fn inventory(&self, ctx: &mut EvalContext<'_>, frame: &Frame<'_>) -> bool {
        if !region_visible(ctx, frame, RegionId::InventoryPrimary) {
            return false;
        }

        match self {
            Policy::KeyboardMouse => region_visible(ctx, frame, RegionId::InventorySecondary),
            Policy::Gamepad => {
                let Some(band) = ctx.catalog.gray_band() else {
                    return false;
                };
                let bands = detect_gray_bands(frame, band);
                debug!(
                    "Inventory gray bands: {} line(s), separation {} (want {})",
                    bands.lines.len(),
                    bands.separation,
                    band.expected_separation
                );
                bands.found
            }
        }
    }

    /// A recognized character banner proves a match is running; otherwise fall
    /// back to HUD icons that are only drawn in game.
    fn game(&self, ctx: &mut EvalContext<'_>, frame: &Frame<'_>) -> bool {
        if identify_banner(ctx, frame).is_some() {
            return true;
        }

        match self {
            Policy::KeyboardMouse => {
                let grenade = region_visible(ctx, frame, RegionId::GrenadeIcon);
                let tactical = region_visible(ctx, frame, RegionId::TacticalIcon);
                grenade || tactical
            }
            Policy::Gamepad => region_visible(ctx, frame, RegionId::MapIcon),
        }
    }
}

/// Spectator badge in any team colour. Every colour is scored.
fn spectate(ctx: &mut EvalContext<'_>, frame: &Frame<'_>) -> bool {
    let mut any = false;
    for region in RegionId::SPECTATE {
        any |= region_visible(ctx, frame, region);
    }
    any
}
