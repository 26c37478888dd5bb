//! Four-function calculator with a single display line.

use serde_json::json;
use shared_types::AppInput;
use strum::{Display, EnumString};

use super::{AppContext, AppError, Application, TeardownHandle};

pub const ERROR_TEXT: &str = "Error";
/// Characters shown on the display; the full value is kept internally
pub const DISPLAY_WIDTH: usize = 15;
const SIGNIFICANT_DIGITS: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
pub enum Operator {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Subtract,
    #[strum(serialize = "*")]
    Multiply,
    #[strum(serialize = "/")]
    Divide,
}

impl Operator {
    fn apply(self, lhs: f64, rhs: f64) -> Option<f64> {
        match self {
            Operator::Add => Some(lhs + rhs),
            Operator::Subtract => Some(lhs - rhs),
            Operator::Multiply => Some(lhs * rhs),
            Operator::Divide if rhs == 0.0 => None,
            Operator::Divide => Some(lhs / rhs),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Calculator {
    current: String,
    previous: String,
    operator: Option<Operator>,
    reset_display: bool,
}

impl Default for Calculator {
    fn default() -> Self {
        Self {
            current: "0".to_string(),
            previous: String::new(),
            operator: None,
            reset_display: false,
        }
    }
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display(&self) -> String {
        self.current.chars().take(DISPLAY_WIDTH).collect()
    }

    pub fn is_error(&self) -> bool {
        self.current == ERROR_TEXT
    }

    pub fn operator(&self) -> Option<Operator> {
        self.operator
    }

    /// Feed one button press. Unknown keys are rejected without touching state.
    pub fn press(&mut self, key: &str) -> Result<(), AppError> {
        if self.is_error() && key != "C" && key != "CE" {
            tracing::debug!(key, "Calculator in error state; only clear keys accepted");
            return Ok(());
        }

        match key {
            "C" => *self = Self::default(),
            "CE" => {
                self.current = "0".to_string();
                self.reset_display = true;
            }
            "<-" => self.backspace(),
            "=" => self.equals(),
            "." => self.digit('.'),
            _ => {
                if let Ok(op) = key.parse::<Operator>() {
                    self.choose_operator(op);
                } else {
                    let mut chars = key.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) if c.is_ascii_digit() => self.digit(c),
                        _ => {
                            return Err(AppError::InvalidValue(format!(
                                "unknown calculator key '{key}'"
                            )))
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn digit(&mut self, c: char) {
        if c == '.' && self.current.contains('.') && !self.reset_display {
            return;
        }
        if (self.current == "0" && c != '.') || self.reset_display {
            self.current = if c == '.' {
                "0.".to_string()
            } else {
                c.to_string()
            };
            self.reset_display = false;
        } else {
            self.current.push(c);
        }
    }

    fn choose_operator(&mut self, op: Operator) {
        if self.operator.is_some() && !self.previous.is_empty() && !self.reset_display {
            self.compute();
            if self.is_error() {
                return;
            }
        }
        self.operator = Some(op);
        self.previous = self.current.clone();
        self.reset_display = true;
    }

    fn equals(&mut self) {
        if self.operator.is_none() || self.previous.is_empty() {
            return;
        }
        self.compute();
        self.operator = None;
        self.previous.clear();
        self.reset_display = true;
    }

    fn backspace(&mut self) {
        if self.reset_display {
            return;
        }
        self.current.pop();
        if self.current.is_empty() || self.current == "-" {
            self.current = "0".to_string();
        }
    }

    fn compute(&mut self) {
        let Some(op) = self.operator else {
            return;
        };
        let (Ok(lhs), Ok(rhs)) = (self.previous.parse::<f64>(), self.current.parse::<f64>())
        else {
            self.fail();
            return;
        };
        match op.apply(lhs, rhs) {
            Some(value) if value.is_finite() => {
                self.current = format_number(round_significant(value, SIGNIFICANT_DIGITS));
            }
            _ => self.fail(),
        }
    }

    fn fail(&mut self) {
        self.current = ERROR_TEXT.to_string();
        self.operator = None;
        self.previous.clear();
        self.reset_display = true;
    }
}

fn round_significant(value: f64, digits: usize) -> f64 {
    format!("{:.*e}", digits.saturating_sub(1), value)
        .parse()
        .unwrap_or(value)
}

/// Number text as a browser would print it: plain decimals between 1e-6 and
/// 1e21, exponent form with a signed exponent outside that range.
fn format_number(value: f64) -> String {
    if value == 0.0 {
        // also folds -0
        return "0".to_string();
    }
    if (1e-6..1e21).contains(&value.abs()) {
        return value.to_string();
    }
    let formatted = format!("{value:e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted,
    }
}

impl Application for Calculator {
    fn mount(&mut self, cx: &mut AppContext<'_>) -> TeardownHandle {
        cx.teardown()
    }

    fn on_input(&mut self, _cx: &mut AppContext<'_>, input: AppInput) -> Result<(), AppError> {
        match input {
            AppInput::Button { value } => self.press(&value),
            other => Err(AppError::unsupported("calculator", &other)),
        }
    }

    fn snapshot(&self) -> serde_json::Value {
        json!({
            "display": self.display(),
            "operator": self.operator.map(|op| op.to_string()),
            "error": self.is_error(),
        })
    }
}
