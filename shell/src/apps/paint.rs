//! Freehand drawing on a fixed-size canvas.
//!
//! Strokes are recorded as point lists. The snapshot only carries the stroke
//! count and the latest stroke; the front end keeps the pixels and paints
//! whatever part of that stroke it has not drawn yet.

use serde::Serialize;
use serde_json::json;
use shared_types::AppInput;

use super::{AppContext, AppError, Application, TeardownHandle};

pub const CANVAS_WIDTH: f64 = 580.0;
pub const CANVAS_HEIGHT: f64 = 350.0;
pub const MIN_LINE_WIDTH: u32 = 1;
pub const MAX_LINE_WIDTH: u32 = 50;
const DEFAULT_COLOR: &str = "#000000";
const DEFAULT_LINE_WIDTH: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    pub color: String,
    pub width: u32,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone)]
pub struct Paint {
    color: String,
    line_width: u32,
    painting: bool,
    strokes: Vec<Stroke>,
    clear_count: u64,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR.to_string(),
            line_width: DEFAULT_LINE_WIDTH,
            painting: false,
            strokes: Vec::new(),
            clear_count: 0,
        }
    }
}

fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

fn clamp_point(x: f64, y: f64) -> (f64, f64) {
    (x.clamp(0.0, CANVAS_WIDTH), y.clamp(0.0, CANVAS_HEIGHT))
}

impl Paint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn is_painting(&self) -> bool {
        self.painting
    }

    pub fn line_width(&self) -> u32 {
        self.line_width
    }

    fn begin(&mut self, x: f64, y: f64) {
        self.painting = true;
        self.strokes.push(Stroke {
            color: self.color.clone(),
            width: self.line_width,
            points: vec![clamp_point(x, y)],
        });
    }

    fn extend(&mut self, x: f64, y: f64) {
        if !self.painting {
            return;
        }
        match self.strokes.last_mut() {
            Some(stroke) => stroke.points.push(clamp_point(x, y)),
            None => self.begin(x, y),
        }
    }
}

impl Application for Paint {
    fn mount(&mut self, cx: &mut AppContext<'_>) -> TeardownHandle {
        cx.teardown()
    }

    fn on_input(&mut self, _cx: &mut AppContext<'_>, input: AppInput) -> Result<(), AppError> {
        match input {
            AppInput::PointerDown { x, y } => self.begin(x, y),
            AppInput::PointerMove { x, y } => self.extend(x, y),
            AppInput::PointerUp | AppInput::PointerLeave => self.painting = false,
            AppInput::SetColor { color } => {
                if !is_hex_color(&color) {
                    return Err(AppError::InvalidValue(format!(
                        "colour must be #rrggbb, got '{color}'"
                    )));
                }
                self.color = color.to_ascii_lowercase();
            }
            AppInput::SetLineWidth { width } => {
                self.line_width = width.clamp(MIN_LINE_WIDTH, MAX_LINE_WIDTH);
            }
            AppInput::Clear => {
                self.strokes.clear();
                self.painting = false;
                self.clear_count += 1;
            }
            other => return Err(AppError::unsupported("paint", &other)),
        }
        Ok(())
    }

    fn snapshot(&self) -> serde_json::Value {
        json!({
            "color": self.color,
            "line_width": self.line_width,
            "painting": self.painting,
            "stroke_count": self.strokes.len(),
            "last_stroke": self.strokes.last(),
            "clear_count": self.clear_count,
            "canvas": { "width": CANVAS_WIDTH, "height": CANVAS_HEIGHT },
        })
    }
}
