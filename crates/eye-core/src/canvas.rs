use serde::{Deserialize, Serialize};

/// Drawing surface the animator composites each frame onto.
///
/// Colors are palette indices; the animator only ever uses the two entries
/// of its [`Palette`]. Coordinates may fall partly or entirely off-screen and
/// sizes may be zero, implementations clip.
pub trait Canvas {
    /// Fill the whole surface with `color`.
    fn clear(&mut self, color: u8);

    /// Flush the finished frame to the display.
    fn present(&mut self);

    fn fill_round_rect(&mut self, x: i32, y: i32, width: i32, height: i32, radius: i32, color: u8);

    fn fill_triangle(&mut self, p0: (i32, i32), p1: (i32, i32), p2: (i32, i32), color: u8);
}

impl<C: Canvas + ?Sized> Canvas for &mut C {
    fn clear(&mut self, color: u8) {
        (**self).clear(color);
    }

    fn present(&mut self) {
        (**self).present();
    }

    fn fill_round_rect(&mut self, x: i32, y: i32, width: i32, height: i32, radius: i32, color: u8) {
        (**self).fill_round_rect(x, y, width, height, radius, color);
    }

    fn fill_triangle(&mut self, p0: (i32, i32), p1: (i32, i32), p2: (i32, i32), color: u8) {
        (**self).fill_triangle(p0, p1, p2, color);
    }
}

/// The two palette indices used for every draw call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    /// Background and eyelid overlays.
    pub background: u8,
    /// Eye bodies and sweat.
    pub foreground: u8,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: 0,
            foreground: 1,
        }
    }
}
