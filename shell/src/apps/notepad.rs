use serde_json::json;
use shared_types::AppInput;

use super::{AppContext, AppError, Application, TeardownHandle};

/// Plain text editor; the text lives only as long as its window.
#[derive(Debug, Clone, Default)]
pub struct Notepad {
    text: String,
    /// Set on mount so the front end focuses the text area once
    autofocus: bool,
}

impl Notepad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Application for Notepad {
    fn mount(&mut self, cx: &mut AppContext<'_>) -> TeardownHandle {
        self.autofocus = true;
        cx.teardown()
    }

    fn on_input(&mut self, _cx: &mut AppContext<'_>, input: AppInput) -> Result<(), AppError> {
        match input {
            AppInput::Text { text } => {
                self.text = text;
                self.autofocus = false;
                Ok(())
            }
            other => Err(AppError::unsupported("notepad", &other)),
        }
    }

    fn snapshot(&self) -> serde_json::Value {
        json!({
            "text": self.text,
            "chars": self.text.chars().count(),
            "lines": self.text.lines().count().max(1),
            "autofocus": self.autofocus,
        })
    }
}
