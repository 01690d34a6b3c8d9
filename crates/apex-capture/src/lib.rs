use image::{Rgb, RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Bytes per pixel of every frame handed over by the capture side.
pub const BYTES_PER_PIXEL: usize = 4;

/// Pixel rectangle, relative to the top-left corner of the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Same rectangle moved horizontally by `dx` pixels.
    /// Returns `None` if the move would put it left of the frame.
    pub fn shifted(&self, dx: i32) -> Option<Rect> {
        let x = i64::from(self.x) + i64::from(dx);
        let x = u32::try_from(x).ok()?;
        Some(Rect { x, ..*self })
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u64 {
        u64::from(self.x) + u64::from(self.w)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u64 {
        u64::from(self.y) + u64::from(self.h)
    }

    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.w > 0 && self.h > 0 && self.right() <= u64::from(width) && self.bottom() <= u64::from(height)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.w, self.h, self.x, self.y)
    }
}

/// Order of the colour channels inside one 4-byte pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    #[default]
    Rgba,
    Bgra,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SampleError {
    #[error("region {rect} shifted by {offset} exceeds {width}x{height} frame")]
    OutOfBounds {
        rect: Rect,
        offset: i32,
        width: u32,
        height: u32,
    },

    #[error("stride {stride} is shorter than a {width} pixel row")]
    InvalidStride { stride: usize, width: u32 },

    #[error("frame buffer holds {actual} bytes, {expected} needed")]
    BufferTooSmall { expected: usize, actual: usize },
}

/// Read-only view of one captured frame.
///
/// The buffer is borrowed from the capture side and only lives for a single
/// evaluation; nothing downstream can keep it.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    stride: usize,
    order: ChannelOrder,
}

impl<'a> Frame<'a> {
    pub fn new(
        data: &'a [u8],
        width: u32,
        height: u32,
        stride: usize,
        order: ChannelOrder,
    ) -> Result<Self, SampleError> {
        let row_bytes = width as usize * BYTES_PER_PIXEL;
        if stride < row_bytes {
            return Err(SampleError::InvalidStride { stride, width });
        }
        // The last row does not need padding after it
        let expected = match height {
            0 => 0,
            h => stride * (h as usize - 1) + row_bytes,
        };
        if data.len() < expected {
            return Err(SampleError::BufferTooSmall {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            data,
            width,
            height,
            stride,
            order,
        })
    }

    /// Borrow a tightly packed RGBA image as a frame.
    pub fn from_rgba_image(image: &'a RgbaImage) -> Self {
        Self {
            data: image.as_raw(),
            width: image.width(),
            height: image.height(),
            stride: image.width() as usize * BYTES_PER_PIXEL,
            order: ChannelOrder::Rgba,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// RGB value of a single pixel. Coordinates must be inside the frame.
    pub fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        debug_assert!(x < self.width && y < self.height);
        let i = y as usize * self.stride + x as usize * BYTES_PER_PIXEL;
        let px = &self.data[i..i + 3];
        match self.order {
            ChannelOrder::Rgba => [px[0], px[1], px[2]],
            ChannelOrder::Bgra => [px[2], px[1], px[0]],
        }
    }
}

/// Crop `rect`, moved horizontally by `x_offset`, out of the frame as RGB.
pub fn sample(frame: &Frame<'_>, rect: &Rect, x_offset: i32) -> Result<RgbImage, SampleError> {
    let out_of_bounds = || SampleError::OutOfBounds {
        rect: *rect,
        offset: x_offset,
        width: frame.width,
        height: frame.height,
    };

    let area = rect.shifted(x_offset).ok_or_else(out_of_bounds)?;
    if !area.fits_within(frame.width, frame.height) {
        return Err(out_of_bounds());
    }

    Ok(RgbImage::from_fn(area.w, area.h, |x, y| {
        Rgb(frame.rgb(area.x + x, area.y + y))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_frame(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([(x % 256) as u8, (y % 256) as u8, 40, 255])
        })
    }

    #[test]
    fn test_sample_region() {
        let img = gradient_frame(64, 32);
        let frame = Frame::from_rgba_image(&img);
        let crop = sample(&frame, &Rect::new(10, 5, 8, 4), 0).unwrap();
        assert_eq!(crop.dimensions(), (8, 4));
        assert_eq!(crop.get_pixel(0, 0).0, [10, 5, 40]);
        assert_eq!(crop.get_pixel(7, 3).0, [17, 8, 40]);
    }

    #[test]
    fn test_sample_with_offset() {
        let img = gradient_frame(64, 32);
        let frame = Frame::from_rgba_image(&img);
        let crop = sample(&frame, &Rect::new(10, 5, 8, 4), -3).unwrap();
        assert_eq!(crop.get_pixel(0, 0).0, [7, 5, 40]);
    }

    #[test]
    fn test_sample_out_of_bounds() {
        let img = gradient_frame(64, 32);
        let frame = Frame::from_rgba_image(&img);

        let err = sample(&frame, &Rect::new(60, 0, 8, 4), 0).unwrap_err();
        assert!(matches!(err, SampleError::OutOfBounds { .. }));

        // Fits at zero offset but not once shifted
        assert!(sample(&frame, &Rect::new(50, 0, 8, 4), 0).is_ok());
        assert!(sample(&frame, &Rect::new(50, 0, 8, 4), 7).is_err());
        assert!(sample(&frame, &Rect::new(2, 0, 8, 4), -3).is_err());
    }

    #[test]
    fn test_bgra_frame_converts_to_rgb() {
        // One BGRA pixel per row, padded stride of 8 bytes
        let data = [30u8, 20, 10, 255, 0, 0, 0, 0, 3, 2, 1, 255];
        let frame = Frame::new(&data, 1, 2, 8, ChannelOrder::Bgra).unwrap();
        let crop = sample(&frame, &Rect::new(0, 0, 1, 2), 0).unwrap();
        assert_eq!(crop.get_pixel(0, 0).0, [10, 20, 30]);
        assert_eq!(crop.get_pixel(0, 1).0, [1, 2, 3]);
    }

    #[test]
    fn test_frame_validation() {
        let data = vec![0u8; 16];
        assert_eq!(
            Frame::new(&data, 4, 1, 8, ChannelOrder::Rgba).unwrap_err(),
            SampleError::InvalidStride { stride: 8, width: 4 }
        );
        assert_eq!(
            Frame::new(&data, 2, 3, 8, ChannelOrder::Rgba).unwrap_err(),
            SampleError::BufferTooSmall {
                expected: 24,
                actual: 16
            }
        );
        assert!(Frame::new(&data, 2, 2, 8, ChannelOrder::Rgba).is_ok());
    }

    #[test]
    fn test_rect_shifted() {
        let rect = Rect::new(5, 1, 2, 2);
        assert_eq!(rect.shifted(-5), Some(Rect::new(0, 1, 2, 2)));
        assert_eq!(rect.shifted(-6), None);
        assert!(Rect::new(0, 0, 1920, 1080).fits_within(1920, 1080));
        assert!(!Rect::new(1, 0, 1920, 1080).fits_within(1920, 1080));
    }
}
