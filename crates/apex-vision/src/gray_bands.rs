use apex_capture::Frame;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Luma the separator lines are drawn with
const TARGET_LUMA: i32 = 118;
/// Allowed distance of every channel from [`TARGET_LUMA`]
const LUMA_BAND: i32 = 14;
/// Maximum spread between the channels of one pixel
const CHANNEL_TOLERANCE: i32 = 8;
/// A run has to be longer than this to count as a line
const MIN_RUN: u32 = 48;
/// Rows closer than this to the previous line belong to that line
const DUPLICATE_GAP: u32 = 2;

/// Band of the screen scanned for the two separator lines of one profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrayBand {
    /// Column every line starts at
    pub x: u32,
    /// Maximum run length considered, starting at `x`
    pub width: u32,
    /// First row of the band
    pub top: u32,
    /// Row after the last row of the band
    pub bottom: u32,
    /// Exact distance in rows between the two lines when the state holds
    pub expected_separation: u32,
}

impl GrayBand {
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.top < self.bottom
            && self.bottom <= height
            && u64::from(self.x) + u64::from(self.width) <= u64::from(width)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrayLine {
    pub y: u32,
    /// Last gray column of the run
    pub end_x: u32,
    pub count: u32,
}

/// Outcome of a gray band scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrayBands {
    pub found: bool,
    /// Rows between the two lines, 0 unless two were seen
    pub separation: u32,
    /// Recorded lines, bottom-most first
    pub lines: Vec<GrayLine>,
}

fn is_neutral_gray([r, g, b]: [u8; 3]) -> bool {
    let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
    let in_band = |c: i32| (c - TARGET_LUMA).abs() <= LUMA_BAND;
    let spread = r.max(g).max(b) - r.min(g).min(b);
    in_band(r) && in_band(g) && in_band(b) && spread < CHANNEL_TOLERANCE
}

/// Length of the gray run starting at the band's left edge on row `y`.
fn run_length(frame: &Frame<'_>, band: &GrayBand, y: u32) -> u32 {
    (band.x..band.x + band.width)
        .take_while(|&x| is_neutral_gray(frame.rgb(x, y)))
        .count() as u32
}

/// Look for the two horizontal separator lines inside `band`.
///
/// Rows are scanned bottom to top. The scan stops at the second distinct line.
/// Only an exact match of the expected separation counts as found.
pub fn detect_gray_bands(frame: &Frame<'_>, band: &GrayBand) -> GrayBands {
    if !band.fits_within(frame.width(), frame.height()) {
        debug!("Gray band {:?} outside {}x{} frame", band, frame.width(), frame.height());
        return GrayBands::default();
    }

    let mut lines: Vec<GrayLine> = Vec::with_capacity(2);

    for y in (band.top..band.bottom).rev() {
        if !is_neutral_gray(frame.rgb(band.x, y)) {
            continue;
        }

        let count = run_length(frame, band, y);
        if count <= MIN_RUN {
            continue;
        }

        if let Some(prev) = lines.last() {
            if prev.y - y <= DUPLICATE_GAP {
                continue;
            }
        }

        lines.push(GrayLine {
            y,
            end_x: band.x + count - 1,
            count,
        });
        if lines.len() == 2 {
            break;
        }
    }

    let separation = match lines.as_slice() {
        [first, second] => first.y - second.y,
        _ => 0,
    };
    let found = lines.len() == 2 && separation == band.expected_separation;

    GrayBands {
        found,
        separation,
        lines,
    }
}
