use strum::EnumString;

/// Keyboard key as reported by `KeyboardEvent.key`
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
    Escape,
    #[strum(serialize = " ", serialize = "Space")]
    Space,
    #[strum(default)]
    Other(String),
}

impl Key {
    pub fn parse(raw: &str) -> Self {
        raw.parse().unwrap_or_else(|_| Key::Other(raw.to_string()))
    }

    /// Unit step for arrow keys, `None` for everything else
    pub fn direction(&self) -> Option<(i32, i32)> {
        match self {
            Key::ArrowUp => Some((0, -1)),
            Key::ArrowDown => Some((0, 1)),
            Key::ArrowLeft => Some((-1, 0)),
            Key::ArrowRight => Some((1, 0)),
            _ => None,
        }
    }
}
