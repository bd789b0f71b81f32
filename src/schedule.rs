//! The frame scheduler: a pure function from configuration and total character
//! count to the ordered per-frame reveal plan.

use crate::config::AnimationConfig;

/// Trailing hold duration after typing completes, in seconds.
const HOLD_SECONDS: u32 = 2;

/// One output frame's worth of scheduling state.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScheduledFrame {
    /// Count of characters (newlines included) visible in this frame.
    /// Monotonically non-decreasing; never exceeds the total character count.
    pub reveal: usize,
    /// Effective cursor visibility: blink phase AND the config toggle.
    /// Forced off for every hold-phase frame.
    pub cursor_visible: bool,
    /// Normalized frame index in `[0, 1)` across the whole animation.
    pub progress: f64,
}

/// Characters revealed per frame: `max(1, floor(2 * speed))`.
pub fn chars_per_frame(speed: f64) -> usize {
    (2.0 * speed).floor().max(1.0) as usize
}

/// Frames between cursor blink-state toggles (~0.5s period at `fps`).
pub fn blink_interval(fps: u32) -> usize {
    ((fps / 2) as usize).max(1)
}

/// Number of trailing hold frames at full reveal.
pub fn hold_frames(fps: u32) -> usize {
    (fps * HOLD_SECONDS) as usize
}

/// Build the ordered frame plan for `total_chars` characters of input.
///
/// The typing phase steps the reveal position by [`chars_per_frame`] from zero
/// up to exactly `total_chars` (the final step is clamped, never overshooting),
/// then a fixed 2-second hold phase keeps the completed text on screen with
/// the cursor off. An empty input still yields one typing frame plus the hold.
pub fn schedule(total_chars: usize, config: &AnimationConfig) -> Vec<ScheduledFrame> {
    let step = chars_per_frame(config.speed);
    let blink = blink_interval(config.fps);
    let typing = total_chars.div_ceil(step) + 1;
    let total_frames = typing + hold_frames(config.fps);

    let mut frames = Vec::with_capacity(total_frames);
    let mut reveal = 0usize;
    for index in 0..typing {
        // Blink phase is a pure function of the frame index; the first
        // interval starts dark.
        let blink_on = (index / blink) % 2 == 1;
        frames.push(ScheduledFrame {
            reveal,
            cursor_visible: blink_on && config.cursor,
            progress: index as f64 / total_frames as f64,
        });
        reveal = (reveal + step).min(total_chars);
    }

    for index in typing..total_frames {
        frames.push(ScheduledFrame {
            reveal: total_chars,
            cursor_visible: false,
            progress: index as f64 / total_frames as f64,
        });
    }

    frames
}
