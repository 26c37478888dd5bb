//! Application plug-ins hosted inside shell windows.
//!
//! The window manager owns every window; an application only sees the
//! [`AppContext`] it is handed for the duration of a call. Anything that has to
//! outlive a call (timers, keyboard listeners, object URLs) is acquired through
//! the context so it is tied to the window and released when the window closes.

pub mod calculator;
pub mod media_player;
pub mod notepad;
pub mod paint;
pub mod snake;

use std::fmt;
use std::time::Duration;

use shared_types::AppInput;
use thiserror::Error;

use crate::keys::Key;
use crate::resources::{ListenerToken, ReleaseSummary, ResourceCounts, Resources, TimerId};

pub use calculator::Calculator;
pub use media_player::MediaPlayer;
pub use notepad::Notepad;
pub use paint::Paint;
pub use snake::SnakeApp;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("{app} does not handle {input}")]
    UnsupportedInput { app: &'static str, input: String },
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    #[error("Playback failed: {0}")]
    Playback(String),
}

impl AppError {
    pub fn unsupported(app: &'static str, input: &AppInput) -> Self {
        AppError::UnsupportedInput {
            app,
            input: format!("{input:?}"),
        }
    }
}

/// Whether an application handled a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Consumed,
    Ignored,
}

/// The content area of a freshly created window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentArea {
    pub window_id: String,
    pub app_id: String,
    pub template: String,
    pub width: i32,
    pub height: i32,
}

/// Per-call handle an application uses to reach its window
pub struct AppContext<'a> {
    content: &'a ContentArea,
    resources: &'a mut Resources,
    title: Option<String>,
}

impl<'a> AppContext<'a> {
    pub(crate) fn new(content: &'a ContentArea, resources: &'a mut Resources) -> Self {
        Self {
            content,
            resources,
            title: None,
        }
    }

    pub fn window_id(&self) -> &str {
        &self.content.window_id
    }

    pub fn content(&self) -> &ContentArea {
        self.content
    }

    /// Replace the window title and its taskbar label
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub(crate) fn take_title(&mut self) -> Option<String> {
        self.title.take()
    }

    pub fn start_timer(&mut self, period: Duration) -> TimerId {
        self.resources.start_timer(&self.content.window_id, period)
    }

    pub fn cancel_timer(&mut self, timer: TimerId) -> bool {
        self.resources
            .cancel_timer(&self.content.window_id, timer)
    }

    /// Receive key presses while this window is active
    pub fn listen_keys(&mut self) -> ListenerToken {
        self.resources.add_key_listener(&self.content.window_id)
    }

    pub fn unlisten_keys(&mut self, token: ListenerToken) -> bool {
        self.resources
            .remove_key_listener(&self.content.window_id, token)
    }

    pub fn register_object_url(&mut self, url: &str) {
        self.resources
            .register_object_url(&self.content.window_id, url);
    }

    pub fn revoke_object_url(&mut self, url: &str) -> bool {
        self.resources
            .revoke_object_url(&self.content.window_id, url)
    }

    /// Teardown that only releases what the window acquired through this context
    pub fn teardown(&self) -> TeardownHandle {
        TeardownHandle {
            window_id: self.content.window_id.clone(),
            hook: None,
        }
    }

    /// Teardown that also runs `hook` before resources are released. The hook
    /// sees what the window still holds at that point.
    pub fn teardown_with(
        &self,
        hook: impl FnOnce(ResourceCounts) + Send + 'static,
    ) -> TeardownHandle {
        TeardownHandle {
            window_id: self.content.window_id.clone(),
            hook: Some(Box::new(hook)),
        }
    }
}

/// Returned by [`Application::mount`]; the window manager runs it on close.
///
/// Only an [`AppContext`] can produce one, so every mounted application has
/// exactly one teardown bound to its own window.
#[must_use = "the window manager runs the teardown when the window closes"]
pub struct TeardownHandle {
    window_id: String,
    hook: Option<Box<dyn FnOnce(ResourceCounts) + Send>>,
}

impl TeardownHandle {
    pub(crate) fn run(self, resources: &mut Resources) -> ReleaseSummary {
        if let Some(hook) = self.hook {
            hook(resources.owned_by(&self.window_id));
        }
        resources.release_window(&self.window_id)
    }
}

impl fmt::Debug for TeardownHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TeardownHandle")
            .field("window_id", &self.window_id)
            .field("has_hook", &self.hook.is_some())
            .finish()
    }
}

/// Contract every hosted application implements
pub trait Application: Send {
    /// Called once, after the window exists and before it is focused.
    fn mount(&mut self, cx: &mut AppContext<'_>) -> TeardownHandle;

    fn on_input(&mut self, cx: &mut AppContext<'_>, input: AppInput) -> Result<(), AppError>;

    /// Only called while the window is active and holds a key listener.
    fn on_key(&mut self, _cx: &mut AppContext<'_>, _key: &Key) -> KeyOutcome {
        KeyOutcome::Ignored
    }

    fn on_timer(&mut self, _cx: &mut AppContext<'_>, _timer: TimerId) {}

    /// View model rendered by the front end
    fn snapshot(&self) -> serde_json::Value;
}


#[cfg(test)]
mod tests {
    use super::testing::Harness;
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_teardown_hook_sees_resources_before_release() {
        let mut harness = Harness::new("player");
        let seen: Arc<Mutex<Vec<ResourceCounts>>> = Arc::default();
        let teardown = harness.with(|cx| {
            cx.register_object_url("blob:clip");
            cx.start_timer(Duration::from_millis(50));
            let seen = Arc::clone(&seen);
            cx.teardown_with(move |held| seen.lock().unwrap().push(held))
        });

        let released = teardown.run(&mut harness.resources);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].object_urls, 1);
        assert_eq!(seen[0].timers, 1);
        assert_eq!(released.object_urls, 1);
        assert_eq!(harness.resources.counts(), ResourceCounts::default());
    }

    #[test]
    fn test_context_cannot_release_another_windows_timer() {
        let mut snake = Harness::new("snake");
        let timer = snake.with(|cx| cx.start_timer(Duration::from_millis(120)));

        // A second window sharing the same resource table
        let rogue = ContentArea {
            window_id: "win_rogue".to_string(),
            ..snake.content.clone()
        };
        let mut cx = AppContext::new(&rogue, &mut snake.resources);
        assert!(!cx.cancel_timer(timer));
        assert_eq!(snake.resources.timer_owner(timer), Some("win_snake"));
    }
}
