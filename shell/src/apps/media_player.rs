//! Plays a single local audio or video file through an object URL.

use serde::Serialize;
use serde_json::json;
use shared_types::AppInput;

use crate::ids::new_ulid;

use super::{AppContext, AppError, Application, TeardownHandle};

pub const DEFAULT_TITLE: &str = "Windows Media Player";
const TITLE_LIMIT: usize = 30;
const TITLE_KEEP: usize = 27;

const SUPPORTED_MIME_TYPES: &[&str] = &[
    "audio/aac",
    "audio/flac",
    "audio/mpeg",
    "audio/mp4",
    "audio/ogg",
    "audio/wav",
    "audio/webm",
    "video/mp4",
    "video/ogg",
    "video/webm",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Idle,
    Playing,
    Paused,
    Ended,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaSource {
    pub name: String,
    pub mime: String,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct MediaPlayer {
    source: Option<MediaSource>,
    state: PlaybackState,
    last_error: Option<String>,
}

impl Default for MediaPlayer {
    fn default() -> Self {
        Self {
            source: None,
            state: PlaybackState::Idle,
            last_error: None,
        }
    }
}

pub fn is_supported_mime(mime: &str) -> bool {
    SUPPORTED_MIME_TYPES.contains(&mime.to_ascii_lowercase().as_str())
}

/// Long file names are cut to 27 characters plus `...`
pub fn display_name(name: &str) -> String {
    if name.chars().count() > TITLE_LIMIT {
        let kept: String = name.chars().take(TITLE_KEEP).collect();
        format!("{kept}...")
    } else {
        name.to_string()
    }
}

impl MediaPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn source(&self) -> Option<&MediaSource> {
        self.source.as_ref()
    }

    fn load(&mut self, cx: &mut AppContext<'_>, name: String, mime: String, url: Option<String>) {
        if let Some(previous) = self.source.take() {
            cx.revoke_object_url(&previous.url);
        }
        let url = url.unwrap_or_else(|| format!("blob:shell/{}", new_ulid()));
        cx.register_object_url(&url);
        cx.set_title(format!("{} - Media Player", display_name(&name)));
        tracing::info!(window_id = %cx.window_id(), name = %name, mime = %mime, "Media loaded");

        self.source = Some(MediaSource { name, mime, url });
        self.last_error = None;
        self.play(cx);
    }

    fn play(&mut self, cx: &AppContext<'_>) {
        let Some(source) = &self.source else {
            return;
        };
        if is_supported_mime(&source.mime) {
            self.state = PlaybackState::Playing;
        } else {
            let reason = format!("unsupported media type '{}'", source.mime);
            tracing::error!(window_id = %cx.window_id(), name = %source.name, %reason, "Playback failed");
            self.state = PlaybackState::Failed;
            self.last_error = Some(reason);
        }
    }
}

impl Application for MediaPlayer {
    fn mount(&mut self, cx: &mut AppContext<'_>) -> TeardownHandle {
        let window_id = cx.window_id().to_string();
        cx.teardown_with(move |held| {
            tracing::info!(
                window_id = %window_id,
                object_urls = held.object_urls,
                "Media player unloaded"
            );
        })
    }

    fn on_input(&mut self, cx: &mut AppContext<'_>, input: AppInput) -> Result<(), AppError> {
        match input {
            AppInput::FileSelected {
                name,
                mime,
                object_url,
            } => self.load(cx, name, mime, object_url),
            AppInput::Play => {
                if self.source.is_none() {
                    return Err(AppError::Playback("no media loaded".to_string()));
                }
                self.play(cx);
            }
            AppInput::Pause => {
                if self.state == PlaybackState::Playing {
                    self.state = PlaybackState::Paused;
                }
            }
            AppInput::Ended => {
                if self.state == PlaybackState::Playing {
                    self.state = PlaybackState::Ended;
                }
            }
            AppInput::PlaybackFailed { reason } => {
                tracing::error!(window_id = %cx.window_id(), %reason, "Playback failed");
                self.state = PlaybackState::Failed;
                self.last_error = Some(reason);
            }
            other => return Err(AppError::unsupported("mediaplayer", &other)),
        }
        Ok(())
    }

    fn snapshot(&self) -> serde_json::Value {
        json!({
            "source": self.source,
            "state": self.state,
            "error": self.last_error,
        })
    }
}
