use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::animator::{
    Eye, EyeAnimator, DEFAULT_BORDER_RADIUS, DEFAULT_EYE_SIZE, DEFAULT_MAX_FPS, DEFAULT_SPACING,
    ONE_SHOT_DURATION_MS,
};
use crate::canvas::{Canvas, Palette};
use crate::mood::{Mood, Position};
use crate::tween::Tween;

// ============================================================
// Serializable config types
// ============================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimatorConfig {
    pub version: u32,
    pub screen_width: i32,
    pub screen_height: i32,
    pub max_fps: u32,
    #[serde(default)]
    pub palette: Palette,
    pub left: EyeSizeConfig,
    pub right: EyeSizeConfig,
    pub spacing: i32,
    #[serde(default)]
    pub mood: Mood,
    /// Gaze anchor last requested. Free gaze from `look_at` or idle moves
    /// is transient and not captured.
    #[serde(default)]
    pub position: Position,
    pub auto_blink: TimerConfig,
    pub idle: TimerConfig,
    #[serde(default)]
    pub curious: bool,
    #[serde(default)]
    pub cyclops: bool,
    pub horizontal_flicker: FlickerConfig,
    pub vertical_flicker: FlickerConfig,
    #[serde(default)]
    pub sweat: bool,
    #[serde(default = "default_one_shot_ms")]
    pub laugh_ms: u64,
    #[serde(default = "default_one_shot_ms")]
    pub confused_ms: u64,
}

fn default_one_shot_ms() -> u64 {
    ONE_SHOT_DURATION_MS
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EyeSizeConfig {
    pub width: i32,
    pub height: i32,
    pub border_radius: i32,
}

impl Default for EyeSizeConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_EYE_SIZE,
            height: DEFAULT_EYE_SIZE,
            border_radius: DEFAULT_BORDER_RADIUS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    pub enabled: bool,
    pub interval_secs: i32,
    pub variation_secs: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlickerConfig {
    pub enabled: bool,
    pub amplitude: i32,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            screen_width: 128,
            screen_height: 64,
            max_fps: DEFAULT_MAX_FPS,
            palette: Palette::default(),
            left: EyeSizeConfig::default(),
            right: EyeSizeConfig::default(),
            spacing: DEFAULT_SPACING,
            mood: Mood::Default,
            position: Position::Center,
            auto_blink: TimerConfig {
                enabled: false,
                interval_secs: 1,
                variation_secs: 4,
            },
            idle: TimerConfig {
                enabled: false,
                interval_secs: 1,
                variation_secs: 3,
            },
            curious: false,
            cyclops: false,
            horizontal_flicker: FlickerConfig {
                enabled: false,
                amplitude: 2,
            },
            vertical_flicker: FlickerConfig {
                enabled: false,
                amplitude: 10,
            },
            sweat: false,
            laugh_ms: ONE_SHOT_DURATION_MS,
            confused_ms: ONE_SHOT_DURATION_MS,
        }
    }
}

// ============================================================
// AnimatorConfig: top-level config
// ============================================================

impl AnimatorConfig {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================
// Conversions: config <-> animator state
// ============================================================

impl<C: Canvas, R: Rng> EyeAnimator<C, R> {
    /// Build an animator whose resting state is `config`. Sizes take effect
    /// immediately instead of animating in; the eyes still start closed.
    pub fn from_config(config: &AnimatorConfig, canvas: C, rng: R) -> Self {
        let mut animator = Self::unconfigured(canvas, rng);

        for (eye, size) in [
            (&mut animator.left, &config.left),
            (&mut animator.right, &config.right),
        ] {
            eye.width = Tween::new(size.width.max(0));
            eye.height = Tween::new(size.height.max(0));
            eye.radius = Tween::new(size.border_radius.max(0));
        }
        animator.spacing = Tween::new(config.spacing);
        animator.palette = config.palette;
        animator.laugh.duration_ms = config.laugh_ms;
        animator.confused.duration_ms = config.confused_ms;

        animator.initialize(config.screen_width, config.screen_height, config.max_fps);
        animator.apply_config(config);
        animator
    }

    /// Apply the behavioral part of `config`: mood, gaze, macro animations.
    /// Geometry changes animate in from the current state.
    pub fn apply_config(&mut self, config: &AnimatorConfig) {
        self.palette = config.palette;
        self.set_mood(config.mood);
        self.set_position(config.position);
        self.set_auto_blink(
            config.auto_blink.enabled,
            Some(config.auto_blink.interval_secs),
            Some(config.auto_blink.variation_secs),
        );
        self.set_idle_mode(
            config.idle.enabled,
            Some(config.idle.interval_secs),
            Some(config.idle.variation_secs),
        );
        self.set_curiosity(config.curious);
        self.set_cyclops(config.cyclops);
        self.set_horizontal_flicker(
            config.horizontal_flicker.enabled,
            Some(config.horizontal_flicker.amplitude),
        );
        self.set_vertical_flicker(
            config.vertical_flicker.enabled,
            Some(config.vertical_flicker.amplitude),
        );
        self.set_sweat(config.sweat);
        self.laugh.duration_ms = config.laugh_ms;
        self.confused.duration_ms = config.confused_ms;
    }
}

impl<C, R> EyeAnimator<C, R> {
    /// Snapshot of the resting configuration.
    pub fn config(&self) -> AnimatorConfig {
        let size = |eye: &Eye| EyeSizeConfig {
            width: eye.width.default,
            height: eye.height.default,
            border_radius: eye.radius.default,
        };
        AnimatorConfig {
            version: AnimatorConfig::CURRENT_VERSION,
            screen_width: self.screen_width,
            screen_height: self.screen_height,
            max_fps: self.max_fps,
            palette: self.palette,
            left: size(&self.left),
            right: size(&self.right),
            spacing: self.spacing.default,
            mood: self.mood,
            position: self.position,
            auto_blink: TimerConfig {
                enabled: self.auto_blink.enabled,
                interval_secs: self.auto_blink.interval_secs,
                variation_secs: self.auto_blink.variation_secs,
            },
            idle: TimerConfig {
                enabled: self.idle.enabled,
                interval_secs: self.idle.interval_secs,
                variation_secs: self.idle.variation_secs,
            },
            curious: self.curious,
            cyclops: self.cyclops,
            horizontal_flicker: FlickerConfig {
                enabled: self.h_flicker.enabled,
                amplitude: self.h_flicker.amplitude,
            },
            vertical_flicker: FlickerConfig {
                enabled: self.v_flicker.enabled,
                amplitude: self.v_flicker.amplitude,
            },
            sweat: self.sweat.enabled,
            laugh_ms: self.laugh.duration_ms,
            confused_ms: self.confused.duration_ms,
        }
    }
}
