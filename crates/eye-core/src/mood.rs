use serde::{Deserialize, Serialize};

use crate::tween::approach;

/// Facial expression, rendered as eyelid overlays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    #[default]
    Default,
    Tired,
    Angry,
    Happy,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Default, Mood::Tired, Mood::Angry, Mood::Happy];

    pub fn label(self) -> &'static str {
        match self {
            Mood::Default => "Default",
            Mood::Tired => "Tired",
            Mood::Angry => "Angry",
            Mood::Happy => "Happy",
        }
    }
}

/// Predefined gaze anchors. `Center` is the screen middle, the rest are
/// compass points on the edges and corners of the legal area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[default]
    Center,
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Position {
    /// Rows of the 3×3 anchor grid, top to bottom.
    pub const GRID: [[Position; 3]; 3] = [
        [Position::NW, Position::N, Position::NE],
        [Position::W, Position::Center, Position::E],
        [Position::SW, Position::S, Position::SE],
    ];

    /// Left-eye target for this anchor inside `[0, max_x] × [0, max_y]`.
    pub fn resolve(self, max_x: i32, max_y: i32) -> (i32, i32) {
        match self {
            Position::N => (max_x / 2, 0),
            Position::NE => (max_x, 0),
            Position::E => (max_x, max_y / 2),
            Position::SE => (max_x, max_y),
            Position::S => (max_x / 2, max_y),
            Position::SW => (0, max_y),
            Position::W => (0, max_y / 2),
            Position::NW => (0, 0),
            Position::Center => (max_x / 2, max_y / 2),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Position::Center => "C",
            Position::N => "N",
            Position::NE => "NE",
            Position::E => "E",
            Position::SE => "SE",
            Position::S => "S",
            Position::SW => "SW",
            Position::W => "W",
            Position::NW => "NW",
        }
    }
}

/// Current/target pair for an eyelid overlay measure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Lid {
    pub current: i32,
    pub next: i32,
}

impl Lid {
    pub fn step(&mut self) {
        self.current = approach(self.current, self.next);
    }
}

/// Eyelid overlays shared by both eyes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Eyelids {
    /// Height of the outer-corner top lid.
    pub tired: Lid,
    /// Height of the inner-corner top lid.
    pub angry: Lid,
    /// How far the bottom lid rises into the eye.
    pub happy: Lid,
}

impl Eyelids {
    /// Derive lid targets from the mood and the rendered left-eye height.
    ///
    /// Tired and angry are resolved one after the other, each zeroing the
    /// other's target when it applies. Happy is independent.
    pub fn retarget(&mut self, mood: Mood, eye_height: i32) {
        let half = eye_height / 2;

        if mood == Mood::Tired {
            self.tired.next = half;
            self.angry.next = 0;
        } else {
            self.tired.next = 0;
        }
        if mood == Mood::Angry {
            self.angry.next = half;
            self.tired.next = 0;
        } else {
            self.angry.next = 0;
        }
        self.happy.next = if mood == Mood::Happy { half } else { 0 };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_cover_corners_edges_and_center() {
        assert_eq!(Position::NW.resolve(56, 28), (0, 0));
        assert_eq!(Position::N.resolve(56, 28), (28, 0));
        assert_eq!(Position::NE.resolve(56, 28), (56, 0));
        assert_eq!(Position::E.resolve(56, 28), (56, 14));
        assert_eq!(Position::SE.resolve(56, 28), (56, 28));
        assert_eq!(Position::S.resolve(56, 28), (28, 28));
        assert_eq!(Position::SW.resolve(56, 28), (0, 28));
        assert_eq!(Position::W.resolve(56, 28), (0, 14));
        assert_eq!(Position::Center.resolve(56, 28), (28, 14));
    }

    #[test]
    fn only_the_active_mood_gets_a_lid_target() {
        let mut lids = Eyelids::default();
        lids.retarget(Mood::Angry, 36);
        assert_eq!((lids.tired.next, lids.angry.next, lids.happy.next), (0, 18, 0));

        lids.retarget(Mood::Happy, 36);
        assert_eq!((lids.tired.next, lids.angry.next, lids.happy.next), (0, 0, 18));

        lids.retarget(Mood::Default, 36);
        assert_eq!((lids.tired.next, lids.angry.next, lids.happy.next), (0, 0, 0));
    }

    #[test]
    fn lid_target_follows_eye_height() {
        let mut lids = Eyelids::default();
        lids.retarget(Mood::Tired, 9);
        assert_eq!(lids.tired.next, 4);
    }

    #[test]
    fn mood_serializes_as_snake_case() {
        let json = serde_json::to_string(&Mood::Happy).unwrap();
        assert_eq!(json, "\"happy\"");
    }
}
