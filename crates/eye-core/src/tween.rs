/// An animatable integer quantity.
///
/// `default` is the configured resting value, `next` is the target the value
/// is walking toward, and `current` is what gets rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tween {
    pub default: i32,
    pub current: i32,
    pub next: i32,
}

impl Tween {
    /// A tween resting at `value`.
    pub const fn new(value: i32) -> Self {
        Self {
            default: value,
            current: value,
            next: value,
        }
    }

    /// Redefine the resting value. The current value is left alone so the
    /// change animates in.
    pub fn set(&mut self, value: i32) {
        self.default = value;
        self.next = value;
    }

    /// Walk `current` halfway toward `next`.
    pub fn step(&mut self) {
        self.current = approach(self.current, self.next);
    }

    /// Walk `current` halfway toward `next + offset`.
    pub fn step_with_offset(&mut self, offset: i32) {
        self.current = approach(self.current, self.next + offset);
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.next
    }
}

/// Integer halving step from `current` toward `target`.
///
/// The midpoint truncates toward zero, which stalls one unit short of the
/// target when the two differ by one; that last unit is taken explicitly so
/// the value always lands. This departs from the plain midpoint rule, which
/// settles an opening eye at 35 of 36 instead of 36.
pub fn approach(current: i32, target: i32) -> i32 {
    let mid = (current + target) / 2;
    if mid == current && current != target {
        current + (target - current).signum()
    } else {
        mid
    }
}
