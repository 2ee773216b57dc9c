use std::time::Instant;

/// Run stopwatch for a playthrough.
///
/// Running and stopped are exclusive: while running only the start instant
/// is meaningful, once stopped only the frozen elapsed value is. Every
/// operation takes `now` explicitly so a session can be replayed with a
/// synthetic clock.
#[derive(Debug, Clone, Default)]
pub struct Timer {
    started_at: Option<Instant>,
    elapsed_secs: f64,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to zero and begin counting from `now`.
    pub fn start(&mut self, now: Instant) {
        self.started_at = Some(now);
        self.elapsed_secs = 0.0;
    }

    /// Freeze the elapsed time. No-op when already stopped.
    pub fn stop(&mut self, now: Instant) {
        if let Some(start) = self.started_at.take() {
            self.elapsed_secs = now.saturating_duration_since(start).as_secs_f64();
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn elapsed(&self, now: Instant) -> f64 {
        match self.started_at {
            Some(start) => now.saturating_duration_since(start).as_secs_f64(),
            None => self.elapsed_secs,
        }
    }

    pub fn format(&self, now: Instant) -> String {
        format_time(self.elapsed(now))
    }
}

/// Render whole seconds as `MM:SS`. Minutes are never wrapped, so an hour
/// and a half prints as `90:00`.
pub fn format_time(total_seconds: f64) -> String {
    let total = total_seconds.max(0.0) as u64;
    let minutes = total / 60;
    let seconds = total % 60;
    format!("{minutes:02}:{seconds:02}")
}
