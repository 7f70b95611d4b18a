//! minifb glue shared by the binaries: keyboard polling and frame timing.

use minifb::{Key, KeyRepeat, Window};
use std::time::{Duration, Instant};
use tracing::info;

use crate::{
    renderer::Rgba,
    sim::{InputState, Keys},
};

/// Held keys: arrows or W/S to move and turn, Alt turns left/right into
/// strafing, Shift runs.
const HELD: [(Key, Keys); 10] = [
    (Key::Left, Keys::TURN_LEFT),
    (Key::Right, Keys::TURN_RIGHT),
    (Key::Up, Keys::FORWARD),
    (Key::W, Keys::FORWARD),
    (Key::Down, Keys::BACK),
    (Key::S, Keys::BACK),
    (Key::LeftAlt, Keys::STRAFE),
    (Key::RightAlt, Keys::STRAFE),
    (Key::LeftShift, Keys::RUN),
    (Key::RightShift, Keys::RUN),
];

/// Edge-triggered keys.
const PRESSED: [(Key, Keys); 5] = [
    (Key::Escape, Keys::QUIT),
    (Key::R, Keys::RESET),
    (Key::T, Keys::TOGGLE_TEXTURE),
    (Key::B, Keys::TOGGLE_BILINEAR),
    (Key::Tab, Keys::TOGGLE_MINIMAP),
];

/// Snapshot the keyboard for this frame.
pub fn poll_input(win: &Window) -> InputState {
    let mut input = InputState::default();
    for (key, flag) in HELD {
        if win.is_key_down(key) {
            input.held |= flag;
        }
    }
    for (key, flag) in PRESSED {
        if win.is_key_pressed(key, KeyRepeat::No) {
            input.pressed |= flag;
        }
    }
    input
}

/// Show a finished frame-buffer.
pub fn present(win: &mut Window, fb: &[Rgba], w: usize, h: usize) -> minifb::Result<()> {
    win.update_with_buffer(fb, w, h)
}

/// Average frame time, logged every few seconds.
pub struct FrameStats {
    acc_time: Duration,
    acc_frames: usize,
    last_print: Instant,
    period: Duration,
}

impl FrameStats {
    pub fn new(period: Duration) -> Self {
        Self {
            acc_time: Duration::ZERO,
            acc_frames: 0,
            last_print: Instant::now(),
            period,
        }
    }

    /// Account one frame that took `elapsed`; reports once per period.
    pub fn record(&mut self, elapsed: Duration) {
        self.acc_time += elapsed;
        self.acc_frames += 1;

        if self.last_print.elapsed() >= self.period {
            if let Some((avg_ms, fps)) = self.summary() {
                info!("avg render: {avg_ms:.2} ms ({fps:.1} FPS)");
            }
            self.acc_time = Duration::ZERO;
            self.acc_frames = 0;
            self.last_print = Instant::now();
        }
    }

    /// Average milliseconds per frame and the matching FPS so far.
    pub fn summary(&self) -> Option<(f64, f64)> {
        if self.acc_frames == 0 {
            return None;
        }
        let avg_ms = self.acc_time.as_secs_f64() * 1000.0 / self.acc_frames as f64;
        Some((avg_ms, 1000.0 / avg_ms.max(f64::EPSILON)))
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(Duration::from_secs(3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_averages_frames() {
        let mut stats = FrameStats::new(Duration::from_secs(3600));
        assert_eq!(stats.summary(), None);
        stats.record(Duration::from_millis(10));
        stats.record(Duration::from_millis(30));
        let (avg_ms, fps) = stats.summary().unwrap();
        assert!((avg_ms - 20.0).abs() < 1e-9);
        assert!((fps - 50.0).abs() < 1e-6);
    }

    #[test]
    fn key_tables_do_not_overlap() {
        for (key, _) in HELD {
            assert!(PRESSED.iter().all(|(k, _)| *k != key));
        }
    }
}
