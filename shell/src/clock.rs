use std::time::Duration;

use chrono::Timelike;

/// `h:mm AM|PM`, hour 0 rendered as 12
pub fn format_clock<T: Timelike>(time: &T) -> String {
    let (pm, hour) = time.hour12();
    format!(
        "{}:{:02} {}",
        hour,
        time.minute(),
        if pm { "PM" } else { "AM" }
    )
}

/// Taskbar clock text, refreshed by whoever drives the shell
#[derive(Debug, Clone)]
pub struct Clock {
    text: String,
    interval: Duration,
}

impl Clock {
    pub fn new(interval: Duration) -> Self {
        Self {
            text: format_clock(&chrono::Local::now()),
            interval,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true when the rendered text changed.
    pub fn tick<T: Timelike>(&mut self, now: &T) -> bool {
        let text = format_clock(now);
        if text == self.text {
            return false;
        }
        self.text = text;
        true
    }
}
