use core::convert::Infallible;

use embedded_graphics::pixelcolor::{Gray8, GrayColor};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle, RoundedRectangle, Triangle};

use crate::canvas::Canvas;

/// Row-major palette indices, the draw target `embedded-graphics` rasterizes
/// into. The palette index travels through the gray channel.
struct Pixels {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Pixels {
    fn index(&self, point: Point) -> Option<usize> {
        let (x, y) = (u32::try_from(point.x).ok()?, u32::try_from(point.y).ok()?);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y * self.width + x) as usize)
    }
}

impl OriginDimensions for Pixels {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Pixels {
    type Color = Gray8;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(i) = self.index(point) {
                self.data[i] = color.luma();
            }
        }
        Ok(())
    }
}

/// In-memory palette framebuffer.
///
/// Holds one palette index per pixel and counts presented frames. The
/// desktop renderer uploads its contents as a texture; tests read pixels
/// back directly.
pub struct Framebuffer {
    pixels: Pixels,
    frames_presented: u64,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: Pixels {
                width,
                height,
                data: vec![0; (width * height) as usize],
            },
            frames_presented: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width
    }

    pub fn height(&self) -> u32 {
        self.pixels.height
    }

    /// Palette index at `(x, y)`, `None` off-screen.
    pub fn pixel(&self, x: i32, y: i32) -> Option<u8> {
        self.pixels
            .index(Point::new(x, y))
            .map(|i| self.pixels.data[i])
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels.data
    }

    pub fn count(&self, color: u8) -> usize {
        self.pixels.data.iter().filter(|&&c| c == color).count()
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

fn drawn(result: Result<(), Infallible>) {
    result.unwrap_or_else(|never| match never {})
}

impl Canvas for Framebuffer {
    fn clear(&mut self, color: u8) {
        self.pixels.data.fill(color);
    }

    fn present(&mut self) {
        self.frames_presented += 1;
    }

    fn fill_round_rect(&mut self, x: i32, y: i32, width: i32, height: i32, radius: i32, color: u8) {
        if width <= 0 || height <= 0 {
            return;
        }
        let radius = radius.clamp(0, width.min(height) / 2) as u32;
        let rect = Rectangle::new(Point::new(x, y), Size::new(width as u32, height as u32));
        drawn(
            RoundedRectangle::with_equal_corners(rect, Size::new_equal(radius))
                .into_styled(PrimitiveStyle::with_fill(Gray8::new(color)))
                .draw(&mut self.pixels),
        );
    }

    fn fill_triangle(&mut self, p0: (i32, i32), p1: (i32, i32), p2: (i32, i32), color: u8) {
        drawn(
            Triangle::new(
                Point::new(p0.0, p0.1),
                Point::new(p1.0, p1.1),
                Point::new(p2.0, p2.1),
            )
            .into_styled(PrimitiveStyle::with_fill(Gray8::new(color)))
            .draw(&mut self.pixels),
        );
    }
}
