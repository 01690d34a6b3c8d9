use image::RgbImage;

/// Peak value of an 8-bit channel
const PEAK: f64 = 255.0;

/// Score reported for two identical images, where the PSNR formula would
/// divide by zero. Well above any threshold worth configuring.
pub const MAX_SCORE: f64 = 1000.0;

/// Peak signal-to-noise ratio between two same-sized RGB images, in dB.
///
/// Higher means more similar. Identical images yield [`MAX_SCORE`].
pub fn score(a: &RgbImage, b: &RgbImage) -> f64 {
    debug_assert_eq!(a.dimensions(), b.dimensions());
    if a.dimensions() != b.dimensions() || a.as_raw().is_empty() {
        return 0.0;
    }

    let squared_error: u64 = a
        .as_raw()
        .iter()
        .zip(b.as_raw())
        .map(|(&x, &y)| {
            let d = u64::from(x.abs_diff(y));
            d * d
        })
        .sum();

    if squared_error == 0 {
        return MAX_SCORE;
    }

    let mse = squared_error as f64 / a.as_raw().len() as f64;
    10.0 * (PEAK * PEAK / mse).log10()
}
