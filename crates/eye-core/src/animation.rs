//! Macro animation drivers.
//!
//! Each driver owns a little timer or phase state and is polled once per
//! frame by the animator, which decides what the result does to the eyes.

use rand::Rng;

/// Uniform integer in `[0, n)`, or 0 for an empty range.
pub(crate) fn roll<R: Rng + ?Sized>(rng: &mut R, n: i32) -> i32 {
    if n <= 0 {
        0
    } else {
        rng.random_range(0..n)
    }
}

/// Periodic trigger with a base interval and random jitter, both in whole
/// seconds. Drives auto-blink and idle gaze.
#[derive(Clone, Debug)]
pub struct IntervalTimer {
    pub enabled: bool,
    pub interval_secs: i32,
    pub variation_secs: i32,
    /// `None` while the next period is waiting for a first timestamp.
    due_at: Option<u64>,
}

impl IntervalTimer {
    pub const fn new(interval_secs: i32, variation_secs: i32) -> Self {
        Self {
            enabled: false,
            interval_secs,
            variation_secs,
            due_at: None,
        }
    }

    /// Timestamp (ms) of the next firing, `None` until one has been rolled.
    pub fn due_at(&self) -> Option<u64> {
        self.due_at
    }

    /// Roll the next firing time relative to `now`.
    pub fn schedule<R: Rng + ?Sized>(&mut self, now: u64, rng: &mut R) {
        let secs = self.interval_secs.max(0).saturating_add(roll(rng, self.variation_secs));
        self.due_at = Some(now.saturating_add(secs as u64 * 1000));
    }

    /// Switch the timer on or off. `None` keeps the current interval or
    /// variation. Turning it on, or changing its timing, counts the next
    /// period from `now`; with no time known yet the period starts at the
    /// next poll.
    pub fn configure<R: Rng + ?Sized>(
        &mut self,
        enabled: bool,
        interval_secs: Option<i32>,
        variation_secs: Option<i32>,
        now: Option<u64>,
        rng: &mut R,
    ) {
        let retimed = interval_secs.is_some() || variation_secs.is_some();
        let switched_on = enabled && !self.enabled;
        self.enabled = enabled;
        if let Some(interval) = interval_secs {
            self.interval_secs = interval;
        }
        if let Some(variation) = variation_secs {
            self.variation_secs = variation;
        }
        if enabled && (switched_on || retimed) {
            match now {
                Some(now) => self.schedule(now, rng),
                None => self.due_at = None,
            }
        }
    }

    /// Returns true when the timer fires at `now`, rescheduling itself. A
    /// pending timer only starts its period here.
    pub fn poll<R: Rng + ?Sized>(&mut self, now: u64, rng: &mut R) -> bool {
        if !self.enabled {
            return false;
        }
        match self.due_at {
            Some(due_at) if now >= due_at => {
                self.schedule(now, rng);
                true
            }
            Some(_) => false,
            None => {
                self.schedule(now, rng);
                false
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OneShotState {
    Idle,
    /// Triggered, waiting for the next frame to start.
    Armed,
    Running { since: u64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OneShotEvent {
    Started,
    Finished,
}

/// Fixed-duration animation that switches itself off again.
#[derive(Clone, Debug)]
pub struct OneShot {
    state: OneShotState,
    pub duration_ms: u64,
}

impl OneShot {
    pub const fn new(duration_ms: u64) -> Self {
        Self {
            state: OneShotState::Idle,
            duration_ms,
        }
    }

    pub fn state(&self) -> OneShotState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != OneShotState::Idle
    }

    /// Arm the animation. Has no effect while one is already in flight.
    pub fn trigger(&mut self) -> bool {
        if self.is_active() {
            return false;
        }
        self.state = OneShotState::Armed;
        true
    }

    pub fn advance(&mut self, now: u64) -> Option<OneShotEvent> {
        match self.state {
            OneShotState::Idle => None,
            OneShotState::Armed => {
                self.state = OneShotState::Running { since: now };
                Some(OneShotEvent::Started)
            }
            OneShotState::Running { since } => {
                if now >= since.saturating_add(self.duration_ms) {
                    self.state = OneShotState::Idle;
                    Some(OneShotEvent::Finished)
                } else {
                    None
                }
            }
        }
    }
}

/// Shiver along one axis: the eyes are displaced by ±amplitude, alternating
/// every frame.
#[derive(Clone, Debug)]
pub struct Flicker {
    pub enabled: bool,
    pub amplitude: i32,
    alternate: bool,
}

impl Flicker {
    pub const fn new(amplitude: i32) -> Self {
        Self {
            enabled: false,
            amplitude,
            alternate: false,
        }
    }

    /// Toggle the flicker. `None` keeps the configured amplitude.
    pub fn set(&mut self, enabled: bool, amplitude: Option<i32>) {
        self.enabled = enabled;
        if let Some(amplitude) = amplitude {
            self.amplitude = amplitude;
        }
    }

    /// Displacement for this frame.
    pub fn offset(&mut self) -> i32 {
        if !self.enabled {
            return 0;
        }
        let offset = if self.alternate {
            self.amplitude
        } else {
            -self.amplitude
        };
        self.alternate = !self.alternate;
        offset
    }
}

pub const SWEAT_RADIUS: i32 = 3;
const SWEAT_BAND: i32 = 30;
const SWEAT_START_Y: f32 = 2.0;
const SWEAT_START_WIDTH: f32 = 1.0;
const SWEAT_START_HEIGHT: f32 = 2.0;

/// Horizontal strip of the screen a droplet spawns in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropBand {
    Left,
    Center,
    Right,
}

impl DropBand {
    fn spawn_x<R: Rng + ?Sized>(self, screen_width: i32, rng: &mut R) -> i32 {
        match self {
            DropBand::Left => roll(rng, SWEAT_BAND),
            DropBand::Center => roll(rng, screen_width - 2 * SWEAT_BAND) + SWEAT_BAND,
            DropBand::Right => screen_width - SWEAT_BAND + roll(rng, SWEAT_BAND),
        }
    }
}

/// Rectangle to fill for one droplet, in whole pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DropShape {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(Clone, Debug)]
pub struct SweatDrop {
    band: DropBand,
    x_initial: i32,
    y: f32,
    y_max: i32,
    width: f32,
    height: f32,
}

impl SweatDrop {
    pub const fn new(band: DropBand) -> Self {
        // y_max starts at zero so the first frame spawns a fresh drop.
        Self {
            band,
            x_initial: 2,
            y: SWEAT_START_Y,
            y_max: 0,
            width: SWEAT_START_WIDTH,
            height: SWEAT_START_HEIGHT,
        }
    }

    pub fn band(&self) -> DropBand {
        self.band
    }

    pub fn x_initial(&self) -> i32 {
        self.x_initial
    }

    pub fn y_max(&self) -> i32 {
        self.y_max
    }

    /// Move the drop one frame further and return its shape.
    pub fn advance<R: Rng + ?Sized>(&mut self, screen_width: i32, rng: &mut R) -> DropShape {
        if self.y <= self.y_max as f32 {
            self.y += 0.5;
        } else {
            self.x_initial = self.band.spawn_x(screen_width, rng);
            self.y = SWEAT_START_Y;
            self.y_max = roll(rng, 10) + 10;
            self.width = SWEAT_START_WIDTH;
            self.height = SWEAT_START_HEIGHT;
            log::trace!("sweat drop respawned at x={} ({:?})", self.x_initial, self.band);
        }

        if self.y <= (self.y_max / 2) as f32 {
            self.width += 0.5;
            self.height += 0.5;
        } else {
            self.width -= 0.1;
            self.height -= 0.5;
        }

        DropShape {
            x: (self.x_initial as f32 - self.width / 2.0) as i32,
            y: self.y as i32,
            width: self.width as i32,
            height: self.height as i32,
        }
    }
}

/// Three droplets running down the forehead: left corner, center, right
/// corner.
#[derive(Clone, Debug)]
pub struct Sweat {
    pub enabled: bool,
    drops: [SweatDrop; 3],
}

impl Default for Sweat {
    fn default() -> Self {
        Self {
            enabled: false,
            drops: [
                SweatDrop::new(DropBand::Left),
                SweatDrop::new(DropBand::Center),
                SweatDrop::new(DropBand::Right),
            ],
        }
    }
}

impl Sweat {
    pub fn drops(&self) -> &[SweatDrop; 3] {
        &self.drops
    }

    pub fn advance<R: Rng + ?Sized>(&mut self, screen_width: i32, rng: &mut R) -> [DropShape; 3] {
        let [left, center, right] = &mut self.drops;
        [
            left.advance(screen_width, rng),
            center.advance(screen_width, rng),
            right.advance(screen_width, rng),
        ]
    }
}
