use rand::rngs::StdRng;
use rand::SeedableRng;
use roboeyes::animation::OneShotState;
use roboeyes::{Canvas, EyeAnimator, Eyelids, Framebuffer, Mood, Position};

#[derive(Clone, Debug, PartialEq, Eq)]
enum DrawCall {
    Clear(u8),
    Present,
    RoundRect {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        radius: i32,
        color: u8,
    },
    Triangle {
        p0: (i32, i32),
        p1: (i32, i32),
        p2: (i32, i32),
        color: u8,
    },
}

#[derive(Default)]
struct RecordingCanvas {
    calls: Vec<DrawCall>,
}

impl RecordingCanvas {
    fn take(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self, color: u8) {
        self.calls.push(DrawCall::Clear(color));
    }

    fn present(&mut self) {
        self.calls.push(DrawCall::Present);
    }

    fn fill_round_rect(&mut self, x: i32, y: i32, width: i32, height: i32, radius: i32, color: u8) {
        self.calls.push(DrawCall::RoundRect {
            x,
            y,
            width,
            height,
            radius,
            color,
        });
    }

    fn fill_triangle(&mut self, p0: (i32, i32), p1: (i32, i32), p2: (i32, i32), color: u8) {
        self.calls.push(DrawCall::Triangle { p0, p1, p2, color });
    }
}

const FOREGROUND: u8 = 1;

fn recording_eyes() -> EyeAnimator<RecordingCanvas, StdRng> {
    EyeAnimator::new(
        RecordingCanvas::default(),
        StdRng::seed_from_u64(7),
        128,
        64,
        100,
    )
}

/// Tick `frames` frames 10 ms apart starting at `start`, returning the time
/// of the last one.
fn run<C: Canvas>(eyes: &mut EyeAnimator<C, StdRng>, start: u64, frames: u64) -> u64 {
    let mut now = start;
    for i in 0..frames {
        now = start + i * 10;
        eyes.tick(now);
    }
    now
}

fn presents(calls: &[DrawCall]) -> usize {
    calls.iter().filter(|c| **c == DrawCall::Present).count()
}

fn foreground_rects(calls: &[DrawCall]) -> usize {
    calls
        .iter()
        .filter(|c| matches!(c, DrawCall::RoundRect { color, .. } if *color == FOREGROUND))
        .count()
}

#[test]
fn cold_start_opens_centered() {
    let mut eyes = recording_eyes();
    eyes.tick(1_000);

    let left = eyes.left_eye();
    assert!(left.height.current > 1);
    assert!(left.height.current <= left.height.default);
    assert_eq!(left.x.current, (128 - (36 + 10 + 36)) / 2);
    assert_eq!(eyes.right_eye().x.current, 23 + 36 + 10);
}

#[test]
fn every_frame_clears_first_and_presents_last() {
    let mut eyes = recording_eyes();
    eyes.canvas_mut().take();
    eyes.tick(1_000);

    let calls = eyes.canvas_mut().take();
    assert_eq!(calls.first(), Some(&DrawCall::Clear(0)));
    assert_eq!(calls.last(), Some(&DrawCall::Present));
    assert_eq!(presents(&calls), 1);
    assert_eq!(foreground_rects(&calls), 2);
}

#[test]
fn geometry_converges_to_new_targets() {
    let mut eyes = recording_eyes();
    eyes.set_eye_width(20, 28);
    eyes.set_border_radius(2, 2);
    eyes.set_spacing(4);
    run(&mut eyes, 1_000, 12);

    assert!(eyes.left_eye().width.is_settled());
    assert_eq!(eyes.left_eye().width.current, 20);
    assert_eq!(eyes.right_eye().width.current, 28);
    assert_eq!(eyes.left_eye().radius.current, 2);
    assert_eq!(eyes.spacing().current, 4);
}

#[test]
fn blink_closes_fully_then_reopens() {
    let mut eyes = recording_eyes();
    let mut now = run(&mut eyes, 1_000, 12);
    assert_eq!(eyes.left_eye().height.current, 36);

    eyes.blink();
    let mut heights = Vec::new();
    for _ in 0..20 {
        now += 10;
        eyes.tick(now);
        heights.push(eyes.left_eye().height.current);
        if heights.len() > 1 && eyes.left_eye().height.current == 36 {
            break;
        }
    }

    assert!(heights.contains(&1), "never closed: {heights:?}");
    assert_eq!(heights.last(), Some(&36), "never reopened: {heights:?}");
    assert!(heights.len() <= 15, "blink took {} frames", heights.len());
    assert_eq!(eyes.right_eye().height.current, 36);
}

#[test]
fn closed_eyes_stay_closed_until_opened() {
    let mut eyes = recording_eyes();
    let now = run(&mut eyes, 1_000, 12);
    eyes.close();
    let now = run(&mut eyes, now + 10, 15);
    assert_eq!(eyes.left_eye().height.current, 1);

    eyes.open();
    run(&mut eyes, now + 10, 15);
    assert_eq!(eyes.left_eye().height.current, 36);
}

#[test]
fn cyclops_draws_a_single_eye() {
    let mut eyes = recording_eyes();
    eyes.set_cyclops(true);
    run(&mut eyes, 1_000, 5);
    eyes.canvas_mut().take();
    eyes.tick(2_000);

    let calls = eyes.canvas_mut().take();
    assert_eq!(foreground_rects(&calls), 1);
    assert_eq!(eyes.right_eye().width.current, 0);
    assert_eq!(eyes.right_eye().height.current, 0);
    assert_eq!(eyes.spacing().current, 0);
}

#[test]
fn cyclops_lids_cover_both_halves_of_the_eye() {
    let mut eyes = recording_eyes();
    eyes.set_cyclops(true);
    eyes.set_mood(Mood::Tired);
    run(&mut eyes, 1_000, 20);
    eyes.canvas_mut().take();
    eyes.tick(2_000);

    let left = eyes.left_eye().frame();
    let mid = left.x + left.width / 2;
    let triangles: Vec<_> = eyes
        .canvas_mut()
        .take()
        .into_iter()
        .filter_map(|c| match c {
            DrawCall::Triangle { p0, p1, .. } => Some((p0.0, p1.0)),
            _ => None,
        })
        .collect();
    assert!(triangles.contains(&(left.x, mid)));
    assert!(triangles.contains(&(mid, left.x + left.width)));
}

#[test]
fn moods_are_exclusive() {
    let mut eyes = recording_eyes();
    eyes.set_mood(Mood::Tired);
    let now = run(&mut eyes, 1_000, 25);
    let lids = eyes.eyelids();
    assert_eq!(lids.tired.current, 18);
    assert_eq!(lids.angry.current, 0);
    assert_eq!(lids.happy.current, 0);

    eyes.set_mood(Mood::Angry);
    let now = run(&mut eyes, now + 10, 15);
    let lids = eyes.eyelids();
    assert_eq!(lids.tired.current, 0);
    assert_eq!(lids.angry.current, 18);

    eyes.set_mood(Mood::Happy);
    let now = run(&mut eyes, now + 10, 15);
    let lids = eyes.eyelids();
    assert_eq!((lids.tired.current, lids.angry.current), (0, 0));
    assert_eq!(lids.happy.current, 18);

    eyes.set_mood(Mood::Default);
    run(&mut eyes, now + 10, 15);
    assert_eq!(*eyes.eyelids(), Eyelids::default());
}

#[test]
fn angry_lids_hang_from_the_inner_corners() {
    let mut eyes = recording_eyes();
    eyes.set_mood(Mood::Angry);
    run(&mut eyes, 1_000, 25);
    eyes.canvas_mut().take();
    eyes.tick(2_000);

    let left = eyes.left_eye().frame();
    let right = eyes.right_eye().frame();
    let apexes: Vec<_> = eyes
        .canvas_mut()
        .take()
        .into_iter()
        .filter_map(|c| match c {
            DrawCall::Triangle { p2, .. } if p2.1 > left.y => Some(p2.0),
            _ => None,
        })
        .collect();
    assert_eq!(apexes, vec![left.x + left.width, right.x]);
}

#[test]
fn tired_lids_hang_from_the_outer_corners() {
    let mut eyes = recording_eyes();
    eyes.set_mood(Mood::Tired);
    run(&mut eyes, 1_000, 25);
    eyes.canvas_mut().take();
    eyes.tick(2_000);

    let left = eyes.left_eye().frame();
    let right = eyes.right_eye().frame();
    let lids: Vec<_> = eyes
        .canvas_mut()
        .take()
        .into_iter()
        .filter(|c| matches!(c, DrawCall::Triangle { p2, .. } if p2.1 > left.y))
        .collect();
    assert_eq!(
        lids,
        vec![
            DrawCall::Triangle {
                p0: (left.x, left.y - 1),
                p1: (left.x + left.width, left.y - 1),
                p2: (left.x, left.y + 18 - 1),
                color: 0,
            },
            DrawCall::Triangle {
                p0: (right.x, right.y - 1),
                p1: (right.x + right.width, right.y - 1),
                p2: (right.x + right.width, right.y + 18 - 1),
                color: 0,
            },
        ]
    );
}

fn background_rects(calls: Vec<DrawCall>) -> Vec<DrawCall> {
    calls
        .into_iter()
        .filter(|c| matches!(c, DrawCall::RoundRect { color: 0, .. }))
        .collect()
}

#[test]
fn happy_lid_rises_from_below_each_eye() {
    let mut eyes = recording_eyes();
    eyes.set_mood(Mood::Happy);
    run(&mut eyes, 1_000, 25);
    eyes.canvas_mut().take();
    eyes.tick(2_000);

    let offset = eyes.eyelids().happy.current;
    assert_eq!(offset, 18);
    let lid = |eye: roboeyes::EyeFrame| DrawCall::RoundRect {
        x: eye.x - 1,
        y: eye.y + eye.height - offset + 1,
        width: eye.width + 2,
        height: 36,
        radius: eye.radius,
        color: 0,
    };
    let expected = vec![lid(eyes.left_eye().frame()), lid(eyes.right_eye().frame())];
    assert_eq!(background_rects(eyes.canvas_mut().take()), expected);
}

#[test]
fn cyclops_happy_lid_covers_only_the_single_eye() {
    let mut eyes = recording_eyes();
    eyes.set_cyclops(true);
    eyes.set_mood(Mood::Happy);
    run(&mut eyes, 1_000, 25);
    eyes.canvas_mut().take();
    eyes.tick(2_000);

    let left = eyes.left_eye().frame();
    let lids = background_rects(eyes.canvas_mut().take());
    assert_eq!(lids.len(), 1);
    assert!(matches!(
        lids[0],
        DrawCall::RoundRect { x, width, .. } if x == left.x - 1 && width == left.width + 2
    ));
}

#[test]
fn curious_glance_right_enlarges_the_right_eye() {
    let mut eyes = recording_eyes();
    eyes.set_curiosity(true);
    eyes.set_position(Position::E);
    run(&mut eyes, 1_000, 15);

    assert_eq!(eyes.right_eye().height_offset, 8);
    assert_eq!(eyes.left_eye().height_offset, 0);
    assert_eq!(eyes.right_eye().height.current, 36 + 8);
    assert_eq!(eyes.left_eye().height.current, 36);
}

#[test]
fn positions_stay_inside_the_legal_area() {
    let mut eyes = recording_eyes();
    let mut now = run(&mut eyes, 1_000, 12);
    for row in Position::GRID {
        for position in row {
            eyes.set_position(position);
            now = run(&mut eyes, now + 10, 12);
            let left = eyes.left_eye();
            assert!((0..=eyes.max_left_eye_x()).contains(&left.x.current), "{position:?}");
            assert!((0..=eyes.max_left_eye_y()).contains(&left.y.current), "{position:?}");
        }
    }
}

#[test]
fn idle_targets_stay_inside_the_legal_area() {
    let mut eyes = recording_eyes();
    let mut now = run(&mut eyes, 1_000, 12);
    eyes.set_idle_mode(true, Some(0), Some(0));

    let mut targets = Vec::new();
    for _ in 0..50 {
        now += 10;
        eyes.tick(now);
        let left = eyes.left_eye();
        assert!((0..=eyes.max_left_eye_x()).contains(&left.x.next));
        assert!((0..=eyes.max_left_eye_y()).contains(&left.y.next));
        targets.push((left.x.next, left.y.next));
    }
    targets.dedup();
    assert!(targets.len() > 1, "idle gaze never moved");
}

#[test]
fn auto_blink_fires_on_schedule() {
    let mut eyes = recording_eyes();
    eyes.tick(1_000);
    eyes.set_auto_blink(true, Some(2), Some(0));
    assert_eq!(eyes.auto_blink().due_at(), Some(3_000));

    let mut now = 1_000;
    while now < 2_990 {
        now += 10;
        eyes.tick(now);
        assert_eq!(eyes.left_eye().height.next, 36, "blinked early at {now}");
    }

    eyes.tick(3_000);
    assert_eq!(eyes.left_eye().height.next, 1);
    assert_eq!(eyes.auto_blink().due_at(), Some(5_000));
}

#[test]
fn auto_blink_enabled_before_the_first_frame_waits_a_full_period() {
    let mut eyes = recording_eyes();
    eyes.set_auto_blink(true, Some(2), Some(0));
    assert_eq!(eyes.auto_blink().due_at(), None);

    eyes.tick(10_000);
    assert_eq!(eyes.left_eye().height.next, 36);
    assert_eq!(eyes.auto_blink().due_at(), Some(12_000));

    let mut now = 10_000;
    while now < 11_990 {
        now += 10;
        eyes.tick(now);
        assert_eq!(eyes.left_eye().height.next, 36, "blinked early at {now}");
    }
    eyes.tick(12_000);
    assert_eq!(eyes.left_eye().height.next, 1);
}

#[test]
fn disabled_auto_blink_never_fires() {
    let mut eyes = recording_eyes();
    eyes.set_auto_blink(false, Some(0), Some(0));
    let mut now = 1_000;
    for _ in 0..100 {
        now += 10;
        eyes.tick(now);
        assert_ne!(eyes.left_eye().height.next, 1);
    }
}

#[test]
fn laugh_runs_for_its_duration() {
    let mut eyes = recording_eyes();
    eyes.tick(1_000);
    eyes.trigger_laugh();
    assert_eq!(eyes.laugh().state(), OneShotState::Armed);

    eyes.tick(1_010);
    assert_eq!(eyes.laugh().state(), OneShotState::Running { since: 1_010 });
    assert!(eyes.vertical_flicker().enabled);
    assert_eq!(eyes.vertical_flicker().amplitude, 5);

    eyes.trigger_laugh();
    eyes.tick(1_020);
    assert_eq!(eyes.laugh().state(), OneShotState::Running { since: 1_010 });

    eyes.tick(1_500);
    assert!(eyes.laugh().is_active());

    eyes.tick(1_510);
    assert!(!eyes.laugh().is_active());
    assert!(!eyes.vertical_flicker().enabled);
    assert_eq!(eyes.vertical_flicker().amplitude, 0);
}

#[test]
fn confused_shakes_sideways() {
    let mut eyes = recording_eyes();
    let now = run(&mut eyes, 1_000, 12);
    let rest = eyes.left_eye().x.next;

    eyes.trigger_confused();
    eyes.tick(now + 10);
    assert!(eyes.horizontal_flicker().enabled);
    assert_eq!(eyes.horizontal_flicker().amplitude, 20);
    let first = eyes.left_eye().x.current;
    eyes.tick(now + 20);
    let second = eyes.left_eye().x.current;
    assert_eq!(first, rest - 20);
    assert!(second > rest, "second frame should swing right: {second}");

    eyes.tick(now + 510);
    assert!(!eyes.confused().is_active());
    assert!(!eyes.horizontal_flicker().enabled);
}

#[test]
fn frame_gate_limits_presents() {
    let mut eyes = EyeAnimator::new(
        RecordingCanvas::default(),
        StdRng::seed_from_u64(7),
        128,
        64,
        50,
    );
    eyes.canvas_mut().take();

    assert!(eyes.tick(1_000));
    assert!(!eyes.tick(1_005));
    assert_eq!(presents(&eyes.canvas_mut().take()), 1);

    assert!(eyes.tick(1_020));
    assert_eq!(eyes.last_frame(), 1_020);
}

#[test]
fn sweat_adds_three_droplets() {
    let mut eyes = recording_eyes();
    eyes.set_sweat(true);
    eyes.canvas_mut().take();
    eyes.tick(1_000);
    assert_eq!(foreground_rects(&eyes.canvas_mut().take()), 2 + 3);
}

#[test]
fn framebuffer_shows_two_open_eyes() {
    let mut eyes = EyeAnimator::new(
        Framebuffer::new(128, 64),
        StdRng::seed_from_u64(7),
        128,
        64,
        100,
    );
    run(&mut eyes, 1_000, 15);

    let left = eyes.left_eye().frame();
    let right = eyes.right_eye().frame();
    let fb = eyes.canvas();
    assert_eq!(
        fb.pixel(left.x + left.width / 2, left.y + left.height / 2),
        Some(FOREGROUND)
    );
    assert_eq!(
        fb.pixel(right.x + right.width / 2, right.y + right.height / 2),
        Some(FOREGROUND)
    );
    assert_eq!(fb.pixel(left.x + left.width + 5, 32), Some(0));
    assert_eq!(fb.pixel(2, 2), Some(0));
}
