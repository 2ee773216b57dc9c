use macroquad::time::get_time;

/// Caps the loop at a target rate: sleep for the bulk of the remaining frame
/// time, then spin the last couple of milliseconds.
pub struct FrameLimiter {
    frame_start: f64,
}

const SPIN_MARGIN: f64 = 0.002;

impl FrameLimiter {
    pub fn new() -> Self {
        Self {
            frame_start: get_time(),
        }
    }

    /// Mark the start of a frame.
    pub fn begin(&mut self) {
        self.frame_start = get_time();
    }

    /// Block until `1 / hz` seconds have passed since [`FrameLimiter::begin`].
    pub fn wait(&self, hz: u32) {
        let Some(target) = frame_time(hz) else {
            return;
        };
        while get_time() - self.frame_start + SPIN_MARGIN < target {
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        while get_time() - self.frame_start < target {
            std::hint::spin_loop();
        }
    }
}

/// Seconds per frame, `None` for an uncapped rate.
fn frame_time(hz: u32) -> Option<f64> {
    (hz > 0).then(|| 1.0 / f64::from(hz))
}
