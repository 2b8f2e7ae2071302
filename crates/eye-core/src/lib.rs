pub mod animation;
pub mod animator;
pub mod canvas;
pub mod clock;
pub mod config;
pub mod framebuffer;
pub mod mood;
pub mod renderer;
pub mod tween;

#[cfg(feature = "gui")]
pub mod gui;

pub use animator::{Eye, EyeAnimator, EyeFrame};
pub use canvas::{Canvas, Palette};
pub use clock::{Clock, SystemClock};
pub use config::AnimatorConfig;
pub use framebuffer::Framebuffer;
pub use mood::{Eyelids, Mood, Position};
pub use renderer::{DisplayColors, FrameRenderer};
pub use tween::Tween;
