//! App registry - descriptors plus the factory that builds each application.

use std::fmt;
use std::sync::Arc;

use shared_types::{
    AppDefinition, APP_CALCULATOR, APP_MEDIA_PLAYER, APP_NOTEPAD, APP_PAINT, APP_SNAKE,
};

use crate::apps::{Application, Calculator, MediaPlayer, Notepad, Paint, SnakeApp};
use crate::config::ShellConfig;

pub type AppFactory = Arc<dyn Fn(&ShellConfig) -> Box<dyn Application> + Send + Sync>;

/// Wrap a constructor as a registry factory
pub fn app_factory<A: Application + 'static>(build: fn(&ShellConfig) -> A) -> AppFactory {
    Arc::new(move |config: &ShellConfig| -> Box<dyn Application> { Box::new(build(config)) })
}

#[derive(Clone)]
pub struct AppEntry {
    pub definition: AppDefinition,
    pub factory: AppFactory,
}

impl fmt::Debug for AppEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppEntry")
            .field("definition", &self.definition)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppRegistry {
    entries: Vec<AppEntry>,
}

impl AppRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_core_apps() -> Self {
        Self {
            entries: core_apps(),
        }
    }

    /// Add an app, replacing any entry with the same id in place.
    pub fn register(&mut self, definition: AppDefinition, factory: AppFactory) {
        let entry = AppEntry {
            definition,
            factory,
        };
        match self
            .entries
            .iter_mut()
            .find(|e| e.definition.id == entry.definition.id)
        {
            Some(existing) => {
                tracing::info!(app_id = %entry.definition.id, "Replacing registered app");
                *existing = entry;
            }
            None => {
                tracing::debug!(app_id = %entry.definition.id, "Registered app");
                self.entries.push(entry);
            }
        }
    }

    pub fn get(&self, app_id: &str) -> Option<&AppEntry> {
        self.entries.iter().find(|e| e.definition.id == app_id)
    }

    pub fn contains(&self, app_id: &str) -> bool {
        self.get(app_id).is_some()
    }

    /// Definitions in registration order
    pub fn definitions(&self) -> Vec<AppDefinition> {
        self.entries.iter().map(|e| e.definition.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn definition(
    id: &str,
    name: &str,
    icon: &str,
    (default_width, default_height): (i32, i32),
    content_template: &str,
) -> AppDefinition {
    AppDefinition {
        id: id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        content_template: content_template.trim().to_string(),
        default_width,
        default_height,
    }
}

const NOTEPAD_TEMPLATE: &str = r#"<textarea class="notepad-textarea" spellcheck="false"></textarea>"#;

const CALCULATOR_TEMPLATE: &str = r#"
<div class="calculator-app">
  <div class="calculator-display">0</div>
  <div class="calculator-buttons"></div>
</div>"#;

const PAINT_TEMPLATE: &str = r#"
<div class="paint-app">
  <div class="paint-toolbar"></div>
  <div class="paint-canvas-container"><canvas width="580" height="350"></canvas></div>
</div>"#;

const MEDIA_PLAYER_TEMPLATE: &str = r#"
<div class="mediaplayer-app">
  <video controls></video>
  <div class="media-controls"><input type="file" accept="video/*,audio/*"></div>
</div>"#;

const SNAKE_TEMPLATE: &str = r#"
<div class="snake-game-app">
  <div class="snake-score">Score: <span>0</span></div>
  <canvas width="300" height="300"></canvas>
  <button>Restart Game</button>
</div>"#;

/// The five apps every desktop ships with
pub fn core_apps() -> Vec<AppEntry> {
    vec![
        AppEntry {
            definition: definition(
                APP_NOTEPAD,
                "Untitled - Notepad",
                "icons/notepad.svg",
                (500, 400),
                NOTEPAD_TEMPLATE,
            ),
            factory: app_factory(|_| Notepad::new()),
        },
        AppEntry {
            definition: definition(
                APP_CALCULATOR,
                "Calculator",
                "icons/calculator.svg",
                (240, 320),
                CALCULATOR_TEMPLATE,
            ),
            factory: app_factory(|_| Calculator::new()),
        },
        AppEntry {
            definition: definition(
                APP_PAINT,
                "Untitled - Paint",
                "icons/paint.svg",
                (600, 450),
                PAINT_TEMPLATE,
            ),
            factory: app_factory(|_| Paint::new()),
        },
        AppEntry {
            definition: definition(
                APP_MEDIA_PLAYER,
                crate::apps::media_player::DEFAULT_TITLE,
                "icons/media-player.svg",
                (450, 350),
                MEDIA_PLAYER_TEMPLATE,
            ),
            factory: app_factory(|_| MediaPlayer::new()),
        },
        AppEntry {
            definition: definition(
                APP_SNAKE,
                "Snake Game",
                "icons/snake.svg",
                (345, 405),
                SNAKE_TEMPLATE,
            ),
            factory: app_factory(SnakeApp::new),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_apps_registered_in_order() {
        let registry = AppRegistry::with_core_apps();
        let ids: Vec<String> = registry.definitions().into_iter().map(|d| d.id).collect();
        assert_eq!(
            ids,
            vec!["notepad", "calculator", "paint", "mediaplayer", "snake"]
        );
        let calc = registry.get(APP_CALCULATOR).unwrap();
        assert_eq!(calc.definition.default_width, 240);
        assert_eq!(calc.definition.default_height, 320);
    }

    #[test]
    fn test_register_replaces_existing_id() {
        let mut registry = AppRegistry::with_core_apps();
        let mut def = registry.get(APP_NOTEPAD).unwrap().definition.clone();
        def.name = "Scratchpad".to_string();
        registry.register(def, app_factory(|_| Notepad::new()));

        assert_eq!(registry.len(), 5);
        assert_eq!(registry.get(APP_NOTEPAD).unwrap().definition.name, "Scratchpad");
    }

    #[test]
    fn test_factory_builds_fresh_instances() {
        let registry = AppRegistry::with_core_apps();
        let entry = registry.get(APP_CALCULATOR).unwrap();
        let app = (entry.factory)(&ShellConfig::default());
        assert_eq!(app.snapshot()["display"], "0");
    }
}
