use dioxus::prelude::*;
use shared_types::AppInput;

use crate::desktop::state::ShellHandle;
use crate::interop::selected_file;

#[component]
pub fn MediaPlayerView(window_id: String, props: serde_json::Value, shell: ShellHandle) -> Element {
    let source_url = props["source"]["url"].as_str().map(str::to_string);
    let source_name = props["source"]["name"].as_str().unwrap_or_default().to_string();
    let state = props["state"].as_str().unwrap_or("idle").to_string();
    let error = props["error"].as_str().map(str::to_string);
    let failed = state == "failed";

    let id_file = window_id.clone();
    let id_play = window_id.clone();
    let id_pause = window_id.clone();
    let id_ended = window_id.clone();
    let id_error = window_id;

    rsx! {
        div {
            class: "mediaplayer-app",
            style: "display: flex; flex-direction: column; height: 100%; background: #1b1b1b; color: #ddd;",
            div {
                style: "flex: 1; display: flex; align-items: center; justify-content: center; overflow: hidden;",
                if failed {
                    div {
                        class: "media-error",
                        style: "padding: 1rem; color: #ff8a80; text-align: center;",
                        "Cannot play {source_name}"
                        if let Some(reason) = error {
                            div { style: "font-size: 0.75rem; margin-top: 0.25rem;", "{reason}" }
                        }
                    }
                } else if let Some(url) = source_url {
                    video {
                        key: "{url}",
                        src: "{url}",
                        controls: true,
                        autoplay: true,
                        style: "max-width: 100%; max-height: 100%; background: black;",
                        onplay: move |_| shell.app_input(&id_play, AppInput::Play),
                        onpause: move |_| shell.app_input(&id_pause, AppInput::Pause),
                        onended: move |_| shell.app_input(&id_ended, AppInput::Ended),
                        onerror: move |_| {
                            shell.app_input(&id_error, AppInput::PlaybackFailed {
                                reason: "the browser could not decode this file".to_string(),
                            });
                        },
                    }
                } else {
                    span { style: "font-size: 0.8125rem; color: #999;", "Open a video or audio file to start playback" }
                }
            }
            div {
                class: "media-controls",
                style: "display: flex; align-items: center; gap: 0.5rem; padding: 0.375rem 0.5rem; background: #2b2b2b; font-size: 0.75rem;",
                input {
                    r#type: "file",
                    accept: "video/*,audio/*",
                    onchange: move |e| {
                        let Some((name, mime, url)) = selected_file(&e) else {
                            return;
                        };
                        shell.app_input(&id_file, AppInput::FileSelected {
                            name,
                            mime,
                            object_url: Some(url),
                        });
                    },
                }
                span { class: "media-state", "{state}" }
            }
        }
    }
}
