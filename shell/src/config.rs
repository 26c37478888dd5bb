use std::time::Duration;

use crate::geometry::{CascadeLayout, DesktopArea};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Width of the area windows live in
    pub desktop_width: i32,
    /// Height of the area windows live in, taskbar excluded
    pub desktop_height: i32,
    /// Height reserved for the taskbar at the bottom of the viewport
    pub taskbar_height: i32,
    pub cascade_origin: i32,
    pub cascade_step: i32,
    pub cascade_right_margin: i32,
    pub cascade_bottom_margin: i32,
    /// How often the taskbar clock re-renders
    pub clock_interval: Duration,
    /// Snake game loop period
    pub snake_tick: Duration,
    /// Random food placement attempts before falling back to a free-cell scan
    pub food_placement_retries: usize,
    /// Default tracing filter when RUST_LOG is unset
    pub log_filter: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            desktop_width: 1280,
            desktop_height: 720,
            taskbar_height: 40,
            cascade_origin: 50,
            cascade_step: 20,
            cascade_right_margin: 20,
            cascade_bottom_margin: 40,
            clock_interval: Duration::from_secs(1),
            snake_tick: Duration::from_millis(120),
            food_placement_retries: 64,
            log_filter: "info".to_string(),
        }
    }
}

impl ShellConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let config = Self {
            desktop_width: env_parse("SHELL_DESKTOP_WIDTH", defaults.desktop_width)?,
            desktop_height: env_parse("SHELL_DESKTOP_HEIGHT", defaults.desktop_height)?,
            taskbar_height: env_parse("SHELL_TASKBAR_HEIGHT", defaults.taskbar_height)?,
            cascade_origin: env_parse("SHELL_CASCADE_ORIGIN", defaults.cascade_origin)?,
            cascade_step: env_parse("SHELL_CASCADE_STEP", defaults.cascade_step)?,
            cascade_right_margin: env_parse(
                "SHELL_CASCADE_RIGHT_MARGIN",
                defaults.cascade_right_margin,
            )?,
            cascade_bottom_margin: env_parse(
                "SHELL_CASCADE_BOTTOM_MARGIN",
                defaults.cascade_bottom_margin,
            )?,
            clock_interval: Duration::from_millis(env_parse("SHELL_CLOCK_INTERVAL_MS", 1000)?),
            snake_tick: Duration::from_millis(env_parse("SHELL_SNAKE_TICK_MS", 120)?),
            food_placement_retries: env_parse(
                "SHELL_FOOD_PLACEMENT_RETRIES",
                defaults.food_placement_retries,
            )?,
            log_filter: env_str("SHELL_LOG_FILTER", &defaults.log_filter),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.desktop_width <= 0 || self.desktop_height <= 0 {
            anyhow::bail!(
                "Desktop area must be positive, got {}x{}",
                self.desktop_width,
                self.desktop_height
            );
        }
        if self.taskbar_height < 0 {
            anyhow::bail!("SHELL_TASKBAR_HEIGHT must not be negative");
        }
        if self.clock_interval.is_zero() || self.snake_tick.is_zero() {
            anyhow::bail!("Timer periods must be greater than zero");
        }
        if self.food_placement_retries == 0 {
            anyhow::bail!("SHELL_FOOD_PLACEMENT_RETRIES must be at least 1");
        }
        Ok(())
    }

    pub fn desktop_area(&self) -> DesktopArea {
        DesktopArea {
            width: self.desktop_width,
            height: self.desktop_height,
        }
    }

    /// Desktop area left over once the taskbar takes its strip of a viewport
    pub fn area_for_viewport(&self, width: i32, height: i32) -> DesktopArea {
        DesktopArea::from_viewport(width, height, self.taskbar_height)
    }

    pub fn cascade(&self) -> CascadeLayout {
        CascadeLayout {
            origin: self.cascade_origin,
            step: self.cascade_step,
            right_margin: self.cascade_right_margin,
            bottom_margin: self.cascade_bottom_margin,
        }
    }
}

fn env_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Failed to parse env var {key}={val}: {e}")),
        Err(_) => Ok(default),
    }
}
