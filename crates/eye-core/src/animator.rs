use log::{debug, trace};
use rand::Rng;

use crate::animation::{roll, Flicker, IntervalTimer, OneShot, OneShotEvent, Sweat, SWEAT_RADIUS};
use crate::canvas::{Canvas, Palette};
use crate::clock::Clock;
use crate::mood::{Eyelids, Mood, Position};
use crate::tween::Tween;

pub const DEFAULT_EYE_SIZE: i32 = 36;
pub const DEFAULT_BORDER_RADIUS: i32 = 8;
pub const DEFAULT_SPACING: i32 = 10;
pub const DEFAULT_MAX_FPS: u32 = 50;
pub const ONE_SHOT_DURATION_MS: u64 = 500;

/// Height of a fully closed eye.
const CLOSED_HEIGHT: i32 = 1;
/// Extra height of an eye glancing towards its screen edge in curious mode.
const CURIOUS_OFFSET: i32 = 8;
const CURIOUS_EDGE: i32 = 10;
const LAUGH_AMPLITUDE: i32 = 5;
const CONFUSED_AMPLITUDE: i32 = 20;

/// Geometry of one eye.
#[derive(Clone, Debug)]
pub struct Eye {
    pub width: Tween,
    pub height: Tween,
    pub radius: Tween,
    pub x: Tween,
    pub y: Tween,
    /// Transient enlargement from curious mode.
    pub height_offset: i32,
    /// Whether the eye reopens once it has finished closing.
    pub is_open: bool,
}

/// Rendered rectangle of an eye for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EyeFrame {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub radius: i32,
}

impl Eye {
    fn new() -> Self {
        Self {
            width: Tween::new(DEFAULT_EYE_SIZE),
            height: Tween::new(DEFAULT_EYE_SIZE),
            radius: Tween::new(DEFAULT_BORDER_RADIUS),
            x: Tween::default(),
            y: Tween::default(),
            height_offset: 0,
            is_open: false,
        }
    }

    pub fn frame(&self) -> EyeFrame {
        EyeFrame {
            x: self.x.current,
            y: self.y.current,
            width: self.width.current,
            height: self.height.current,
            radius: self.radius.current,
        }
    }

    fn close(&mut self) {
        self.height.next = CLOSED_HEIGHT;
        self.is_open = false;
    }

    /// Resize towards the height target, keep the eye vertically centered,
    /// and start reopening once it is shut.
    fn settle_height(&mut self) {
        self.height.step_with_offset(self.height_offset);
        self.y.current += (self.height.default - self.height.current) / 2;
        self.y.current -= self.height_offset / 2;

        if self.is_open && self.height.current <= CLOSED_HEIGHT + self.height_offset {
            self.height.next = self.height.default;
        }
    }
}

/// Which top corner a lid triangle hangs from.
#[derive(Clone, Copy)]
enum Slant {
    Outer,
    Inner,
}

/// Animated pair of eyes on a pixel display.
///
/// Owns all animation state and the canvas it draws on. Drive it by calling
/// [`tick`](Self::tick) (or [`update`](Self::update)) from the host loop; it
/// renders at most one frame per configured frame interval.
pub struct EyeAnimator<C, R> {
    pub(crate) canvas: C,
    pub(crate) rng: R,

    pub(crate) screen_width: i32,
    pub(crate) screen_height: i32,
    pub(crate) max_fps: u32,
    pub(crate) frame_interval: u64,
    pub(crate) last_frame: u64,
    /// Latest clock value seen by `tick`, timers armed by setters count
    /// from here. `None` before the first tick.
    pub(crate) now: Option<u64>,
    pub(crate) palette: Palette,

    pub(crate) left: Eye,
    pub(crate) right: Eye,
    pub(crate) spacing: Tween,

    pub(crate) mood: Mood,
    pub(crate) position: Position,
    pub(crate) curious: bool,
    pub(crate) cyclops: bool,
    pub(crate) eyelids: Eyelids,

    pub(crate) auto_blink: IntervalTimer,
    pub(crate) idle: IntervalTimer,
    pub(crate) laugh: OneShot,
    pub(crate) confused: OneShot,
    pub(crate) h_flicker: Flicker,
    pub(crate) v_flicker: Flicker,
    pub(crate) sweat: Sweat,
}

impl<C: Canvas, R: Rng> EyeAnimator<C, R> {
    /// Create an animator for a `width` × `height` screen and run
    /// [`initialize`](Self::initialize).
    pub fn new(canvas: C, rng: R, width: i32, height: i32, max_fps: u32) -> Self {
        let mut animator = Self::unconfigured(canvas, rng);
        animator.initialize(width, height, max_fps);
        animator
    }

    pub(crate) fn unconfigured(canvas: C, rng: R) -> Self {
        Self {
            canvas,
            rng,
            screen_width: 0,
            screen_height: 0,
            max_fps: DEFAULT_MAX_FPS,
            frame_interval: 1000 / DEFAULT_MAX_FPS as u64,
            last_frame: 0,
            now: None,
            palette: Palette::default(),
            left: Eye::new(),
            right: Eye::new(),
            spacing: Tween::new(DEFAULT_SPACING),
            mood: Mood::Default,
            position: Position::Center,
            curious: false,
            cyclops: false,
            eyelids: Eyelids::default(),
            auto_blink: IntervalTimer::new(1, 4),
            idle: IntervalTimer::new(1, 3),
            laugh: OneShot::new(ONE_SHOT_DURATION_MS),
            confused: OneShot::new(ONE_SHOT_DURATION_MS),
            h_flicker: Flicker::new(2),
            v_flicker: Flicker::new(10),
            sweat: Sweat::default(),
        }
    }

    /// Set the screen bounds and frame rate, center both eyes at their
    /// resting geometry and start them closed so the first frames open them.
    pub fn initialize(&mut self, width: i32, height: i32, max_fps: u32) {
        self.screen_width = width;
        self.screen_height = height;

        let pair_width = self.left.width.default + self.spacing.default + self.right.width.default;
        let left_x = (width - pair_width) / 2;
        let left_y = (height - self.left.height.default) / 2;
        let right_x = left_x + self.left.width.current + self.spacing.default;

        self.left.x = Tween::new(left_x);
        self.left.y = Tween::new(left_y);
        self.right.x = Tween::new(right_x);
        self.right.y = Tween::new(left_y);

        self.canvas.clear(self.palette.background);
        self.canvas.present();

        self.left.height.current = CLOSED_HEIGHT;
        self.right.height.current = CLOSED_HEIGHT;
        self.set_frame_rate(max_fps);
        debug!("eyes initialized on {width}x{height} at {max_fps} fps");
    }

    /// Cap rendering at `fps` frames per second. Zero is treated as one.
    pub fn set_frame_rate(&mut self, fps: u32) {
        self.max_fps = fps.max(1);
        self.frame_interval = 1000 / u64::from(self.max_fps);
    }

    pub fn max_fps(&self) -> u32 {
        self.max_fps
    }

    /// Milliseconds between rendered frames.
    pub fn frame_interval(&self) -> u64 {
        self.frame_interval
    }

    pub fn set_palette(&mut self, background: u8, foreground: u8) {
        self.palette = Palette {
            background,
            foreground,
        };
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn set_eye_width(&mut self, left: i32, right: i32) {
        self.left.width.set(left.max(0));
        self.right.width.set(right.max(0));
    }

    pub fn set_eye_height(&mut self, left: i32, right: i32) {
        self.left.height.set(left.max(0));
        self.right.height.set(right.max(0));
    }

    pub fn set_border_radius(&mut self, left: i32, right: i32) {
        self.left.radius.set(left.max(0));
        self.right.radius.set(right.max(0));
    }

    /// Gap between the eyes. Negative values make them overlap.
    pub fn set_spacing(&mut self, space: i32) {
        self.spacing.set(space);
    }

    pub fn set_mood(&mut self, mood: Mood) {
        if mood != self.mood {
            debug!("mood {:?} -> {:?}", self.mood, mood);
        }
        self.mood = mood;
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    /// Send the eyes to one of the predefined anchors.
    pub fn set_position(&mut self, position: Position) {
        let (x, y) = position.resolve(self.max_left_eye_x(), self.max_left_eye_y());
        self.left.x.next = x;
        self.left.y.next = y;
        self.position = position;
        debug!("looking {position:?} ({x}, {y})");
    }

    /// Look at an arbitrary point, constrained to the legal area.
    pub fn look_at(&mut self, x: i32, y: i32) {
        self.left.x.next = constrain(x, self.max_left_eye_x());
        self.left.y.next = constrain(y, self.max_left_eye_y());
    }

    /// Blink on a timer, every `interval` seconds plus up to `variation`
    /// seconds of random jitter. `None` keeps the previous value.
    pub fn set_auto_blink(&mut self, enabled: bool, interval: Option<i32>, variation: Option<i32>) {
        self.auto_blink
            .configure(enabled, interval, variation, self.now, &mut self.rng);
        debug!(
            "auto blink {} (every {}s + 0..{}s)",
            on_off(enabled),
            self.auto_blink.interval_secs,
            self.auto_blink.variation_secs
        );
    }

    /// Let the eyes wander to random positions on a timer, with the same
    /// timing rules as [`set_auto_blink`](Self::set_auto_blink).
    pub fn set_idle_mode(&mut self, enabled: bool, interval: Option<i32>, variation: Option<i32>) {
        self.idle
            .configure(enabled, interval, variation, self.now, &mut self.rng);
        debug!(
            "idle gaze {} (every {}s + 0..{}s)",
            on_off(enabled),
            self.idle.interval_secs,
            self.idle.variation_secs
        );
    }

    /// Enlarge the eye nearer to the screen edge during sideways glances.
    pub fn set_curiosity(&mut self, enabled: bool) {
        self.curious = enabled;
        debug!("curious {}", on_off(enabled));
    }

    /// Show a single eye.
    pub fn set_cyclops(&mut self, enabled: bool) {
        self.cyclops = enabled;
        debug!("cyclops {}", on_off(enabled));
    }

    /// Shake the eyes left and right by `amplitude` pixels.
    pub fn set_horizontal_flicker(&mut self, enabled: bool, amplitude: Option<i32>) {
        self.h_flicker.set(enabled, amplitude);
    }

    /// Shake the eyes up and down by `amplitude` pixels.
    pub fn set_vertical_flicker(&mut self, enabled: bool, amplitude: Option<i32>) {
        self.v_flicker.set(enabled, amplitude);
    }

    pub fn set_sweat(&mut self, enabled: bool) {
        self.sweat.enabled = enabled;
    }

    /// Largest x the left eye may take with both eyes still on screen.
    pub fn max_left_eye_x(&self) -> i32 {
        self.screen_width - self.left.width.current - self.spacing.current - self.right.width.current
    }

    /// Largest y the left eye may take. Uses the resting height so the bound
    /// does not move while blinking.
    pub fn max_left_eye_y(&self) -> i32 {
        self.screen_height - self.left.height.default
    }

    pub fn close(&mut self) {
        self.close_eyes(true, true);
    }

    pub fn open(&mut self) {
        self.open_eyes(true, true);
    }

    pub fn blink(&mut self) {
        self.blink_eyes(true, true);
    }

    pub fn close_eyes(&mut self, left: bool, right: bool) {
        if left {
            self.left.close();
        }
        if right {
            self.right.close();
        }
    }

    /// Mark eyes to reopen. The height follows over the next frames once
    /// they have finished closing.
    pub fn open_eyes(&mut self, left: bool, right: bool) {
        if left {
            self.left.is_open = true;
        }
        if right {
            self.right.is_open = true;
        }
    }

    pub fn blink_eyes(&mut self, left: bool, right: bool) {
        self.close_eyes(left, right);
        self.open_eyes(left, right);
    }

    /// Play the laugh animation: the eyes bounce up and down for a moment.
    pub fn trigger_laugh(&mut self) {
        self.laugh.trigger();
    }

    /// Play the confused animation: the eyes shake sideways for a moment.
    pub fn trigger_confused(&mut self) {
        self.confused.trigger();
    }

    /// Render a frame if at least one frame interval has passed since the
    /// last one. Returns whether a frame was drawn.
    pub fn tick(&mut self, now: u64) -> bool {
        self.now = Some(now);
        if now.saturating_sub(self.last_frame) < self.frame_interval {
            return false;
        }
        self.last_frame = now;

        self.update_geometry();
        self.run_macro_animations(now);
        self.apply_flicker();
        if self.cyclops {
            self.right.width.current = 0;
            self.right.height.current = 0;
            self.spacing.current = 0;
        }
        self.render();
        true
    }

    /// [`tick`](Self::tick) with the time read from `clock`.
    pub fn update(&mut self, clock: &impl Clock) -> bool {
        self.tick(clock.now_ms())
    }

    fn update_geometry(&mut self) {
        if self.curious {
            let near_left = self.left.x.next <= CURIOUS_EDGE;
            let near_right = self.left.x.next >= self.max_left_eye_x() - CURIOUS_EDGE;
            self.left.height_offset = if near_left || (near_right && self.cyclops) {
                CURIOUS_OFFSET
            } else {
                0
            };
            let right_edge = self.screen_width - self.right.width.current - CURIOUS_EDGE;
            self.right.height_offset = if self.right.x.next >= right_edge {
                CURIOUS_OFFSET
            } else {
                0
            };
        } else {
            self.left.height_offset = 0;
            self.right.height_offset = 0;
        }

        self.left.settle_height();
        self.right.settle_height();

        self.left.width.step();
        self.right.width.step();
        self.spacing.step();

        self.left.x.step();
        self.left.y.step();
        // The right eye trails the left one at the current gap.
        self.right.x.next = self.left.x.next + self.left.width.current + self.spacing.current;
        self.right.y.next = self.left.y.next;
        self.right.x.step();
        self.right.y.step();

        self.left.radius.step();
        self.right.radius.step();
    }

    fn run_macro_animations(&mut self, now: u64) {
        if self.auto_blink.poll(now, &mut self.rng) {
            trace!(
                "auto blink at {now}ms, next at {}ms",
                self.auto_blink.due_at().unwrap_or(now)
            );
            self.blink();
        }

        match self.laugh.advance(now) {
            Some(OneShotEvent::Started) => {
                debug!("laugh started at {now}ms");
                self.v_flicker.set(true, Some(LAUGH_AMPLITUDE));
            }
            Some(OneShotEvent::Finished) => {
                debug!("laugh finished at {now}ms");
                self.v_flicker.set(false, Some(0));
            }
            None => {}
        }

        match self.confused.advance(now) {
            Some(OneShotEvent::Started) => {
                debug!("confused started at {now}ms");
                self.h_flicker.set(true, Some(CONFUSED_AMPLITUDE));
            }
            Some(OneShotEvent::Finished) => {
                debug!("confused finished at {now}ms");
                self.h_flicker.set(false, Some(0));
            }
            None => {}
        }

        if self.idle.poll(now, &mut self.rng) {
            let (max_x, max_y) = (self.max_left_eye_x(), self.max_left_eye_y());
            self.left.x.next = roll(&mut self.rng, max_x);
            self.left.y.next = roll(&mut self.rng, max_y);
            trace!("idle gaze to ({}, {})", self.left.x.next, self.left.y.next);
        }
    }

    /// Displace the rendered positions directly so smoothing does not eat
    /// the shake.
    fn apply_flicker(&mut self) {
        let dx = self.h_flicker.offset();
        self.left.x.current += dx;
        self.right.x.current += dx;

        let dy = self.v_flicker.offset();
        self.left.y.current += dy;
        self.right.y.current += dy;
    }

    fn render(&mut self) {
        let Palette {
            background,
            foreground,
        } = self.palette;
        let left = self.left.frame();
        let right = self.right.frame();

        self.canvas.clear(background);
        self.canvas
            .fill_round_rect(left.x, left.y, left.width, left.height, left.radius, foreground);
        if !self.cyclops {
            self.canvas
                .fill_round_rect(right.x, right.y, right.width, right.height, right.radius, foreground);
        }

        self.eyelids.retarget(self.mood, left.height);

        self.eyelids.tired.step();
        self.draw_top_lids(left, right, self.eyelids.tired.current, Slant::Outer);

        self.eyelids.angry.step();
        self.draw_top_lids(left, right, self.eyelids.angry.current, Slant::Inner);

        self.eyelids.happy.step();
        self.draw_bottom_lid(left, self.left.height.default);
        if !self.cyclops {
            self.draw_bottom_lid(right, self.right.height.default);
        }

        if self.sweat.enabled {
            for shape in self.sweat.advance(self.screen_width, &mut self.rng) {
                self.canvas
                    .fill_round_rect(shape.x, shape.y, shape.width, shape.height, SWEAT_RADIUS, foreground);
            }
        }

        self.canvas.present();
    }

    /// Cut a triangular top lid out of each eye. In cyclops mode the single
    /// eye is split in two halves that mirror each other.
    fn draw_top_lids(&mut self, left: EyeFrame, right: EyeFrame, height: i32, slant: Slant) {
        let spans = if self.cyclops {
            let mid = left.x + left.width / 2;
            [(left.x, mid, left.y), (mid, left.x + left.width, left.y)]
        } else {
            [
                (left.x, left.x + left.width, left.y),
                (right.x, right.x + right.width, right.y),
            ]
        };

        for (i, (x0, x1, y)) in spans.into_iter().enumerate() {
            let is_left = i == 0;
            let corner = match (slant, is_left) {
                (Slant::Outer, true) | (Slant::Inner, false) => x0,
                (Slant::Outer, false) | (Slant::Inner, true) => x1,
            };
            self.canvas.fill_triangle(
                (x0, y - 1),
                (x1, y - 1),
                (corner, y + height - 1),
                self.palette.background,
            );
        }
    }

    /// Raise a rounded bottom lid into the eye for the happy look.
    fn draw_bottom_lid(&mut self, eye: EyeFrame, resting_height: i32) {
        let offset = self.eyelids.happy.current;
        self.canvas.fill_round_rect(
            eye.x - 1,
            eye.y + eye.height - offset + 1,
            eye.width + 2,
            resting_height,
            eye.radius,
            self.palette.background,
        );
    }
}

impl<C, R> EyeAnimator<C, R> {
    pub fn left_eye(&self) -> &Eye {
        &self.left
    }

    pub fn right_eye(&self) -> &Eye {
        &self.right
    }

    pub fn spacing(&self) -> &Tween {
        &self.spacing
    }

    pub fn eyelids(&self) -> &Eyelids {
        &self.eyelids
    }

    pub fn screen_size(&self) -> (i32, i32) {
        (self.screen_width, self.screen_height)
    }

    /// Last anchor passed to `set_position`. `look_at` and idle moves steer
    /// the gaze without changing it.
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_curious(&self) -> bool {
        self.curious
    }

    pub fn is_cyclops(&self) -> bool {
        self.cyclops
    }

    pub fn is_sweating(&self) -> bool {
        self.sweat.enabled
    }

    pub fn auto_blink(&self) -> &IntervalTimer {
        &self.auto_blink
    }

    pub fn idle(&self) -> &IntervalTimer {
        &self.idle
    }

    pub fn laugh(&self) -> &OneShot {
        &self.laugh
    }

    pub fn confused(&self) -> &OneShot {
        &self.confused
    }

    pub fn horizontal_flicker(&self) -> &Flicker {
        &self.h_flicker
    }

    pub fn vertical_flicker(&self) -> &Flicker {
        &self.v_flicker
    }

    pub fn sweat(&self) -> &Sweat {
        &self.sweat
    }

    /// Timestamp of the last rendered frame.
    pub fn last_frame(&self) -> u64 {
        self.last_frame
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn into_canvas(self) -> C {
        self.canvas
    }
}

fn constrain(value: i32, max: i32) -> i32 {
    if value < 0 {
        0
    } else if value > max {
        max
    } else {
        value
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}
