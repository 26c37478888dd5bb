use std::f64::consts::TAU;

use dioxus::prelude::*;
use serde::Deserialize;
use shared_types::AppInput;
use web_sys::CanvasRenderingContext2d;

use crate::desktop::state::ShellHandle;
use crate::interop::{canvas_context, capture_pointer, pointer_offset, release_pointer};

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct StrokeView {
    color: String,
    width: u32,
    points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
struct CanvasProps {
    #[serde(default)]
    clear_count: u64,
    #[serde(default)]
    stroke_count: usize,
    #[serde(default)]
    last_stroke: Option<StrokeView>,
}

/// How much of the shell's drawing is already on the canvas
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Drawn {
    clear_count: u64,
    stroke_count: usize,
    points: usize,
}

#[derive(Debug, PartialEq)]
struct Pending {
    wipe: bool,
    stroke: Option<StrokeView>,
    drawn: Drawn,
}

/// Work needed to bring the canvas up to date with a snapshot
fn plan(drawn: Option<Drawn>, props: &CanvasProps) -> Pending {
    let wipe = drawn.map_or(true, |d| d.clear_count != props.clear_count);
    let mut next = Drawn {
        clear_count: props.clear_count,
        stroke_count: props.stroke_count,
        points: 0,
    };
    let Some(last) = &props.last_stroke else {
        return Pending {
            wipe,
            stroke: None,
            drawn: next,
        };
    };
    next.points = last.points.len();

    let already = match drawn {
        Some(d) if !wipe && d.stroke_count == props.stroke_count => d.points,
        _ => 0,
    };
    if already >= last.points.len() {
        return Pending {
            wipe,
            stroke: None,
            drawn: next,
        };
    }
    // Start one point back so the new part joins what is already drawn
    let start = already.saturating_sub(1);
    Pending {
        wipe,
        stroke: Some(StrokeView {
            color: last.color.clone(),
            width: last.width,
            points: last.points[start..].to_vec(),
        }),
        drawn: next,
    }
}

fn wipe(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
    ctx.set_fill_style_str("white");
    ctx.fill_rect(0.0, 0.0, width, height);
}

fn draw_stroke(ctx: &CanvasRenderingContext2d, stroke: &StrokeView) {
    let Some(&(x0, y0)) = stroke.points.first() else {
        return;
    };
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
    ctx.set_stroke_style_str(&stroke.color);
    ctx.set_fill_style_str(&stroke.color);
    ctx.set_line_width(stroke.width as f64);

    ctx.begin_path();
    if stroke.points.len() == 1 {
        let _ = ctx.arc(x0, y0, stroke.width as f64 / 2.0, 0.0, TAU);
        ctx.fill();
        return;
    }
    ctx.move_to(x0, y0);
    for &(x, y) in &stroke.points[1..] {
        ctx.line_to(x, y);
    }
    ctx.stroke();
}

#[component]
pub fn PaintView(window_id: String, props: serde_json::Value, shell: ShellHandle) -> Element {
    let color = props["color"].as_str().unwrap_or("#000000").to_string();
    let line_width = props["line_width"].as_u64().unwrap_or(5);
    let painting = props["painting"].as_bool().unwrap_or(false);
    let canvas_width = props["canvas"]["width"].as_f64().unwrap_or(580.0);
    let canvas_height = props["canvas"]["height"].as_f64().unwrap_or(350.0);
    let canvas_id = format!("{window_id}-canvas");

    let mut drawn = use_signal(|| None::<Drawn>);
    {
        let canvas_id = canvas_id.clone();
        use_effect(use_reactive((&props,), move |(props,)| {
            let Some(ctx) = canvas_context(&canvas_id) else {
                return;
            };
            let update: CanvasProps = serde_json::from_value(props).unwrap_or_default();
            let pending = plan(*drawn.peek(), &update);
            if pending.wipe {
                wipe(&ctx, canvas_width, canvas_height);
            }
            if let Some(stroke) = &pending.stroke {
                draw_stroke(&ctx, stroke);
            }
            drawn.set(Some(pending.drawn));
        }));
    }

    let id_color = window_id.clone();
    let id_width = window_id.clone();
    let id_clear = window_id.clone();
    let id_down = window_id.clone();
    let id_move = window_id.clone();
    let id_up = window_id.clone();
    let id_leave = window_id;

    rsx! {
        div {
            class: "paint-app",
            style: "display: flex; flex-direction: column; height: 100%; background: #c0c0c0;",
            div {
                class: "paint-toolbar",
                style: "display: flex; align-items: center; gap: 0.5rem; padding: 0.25rem 0.5rem; font-size: 0.75rem;",
                label { "Color " }
                input {
                    r#type: "color",
                    value: "{color}",
                    oninput: move |e| shell.app_input(&id_color, AppInput::SetColor { color: e.value() }),
                }
                label { "Size " }
                input {
                    r#type: "range",
                    min: "1",
                    max: "50",
                    value: "{line_width}",
                    oninput: move |e| {
                        if let Ok(width) = e.value().parse::<u32>() {
                            shell.app_input(&id_width, AppInput::SetLineWidth { width });
                        }
                    },
                }
                span { "{line_width}px" }
                button {
                    onclick: move |_| shell.app_input(&id_clear, AppInput::Clear),
                    "Clear"
                }
            }
            div {
                class: "paint-canvas-container",
                style: "flex: 1; overflow: auto; padding: 0.25rem;",
                canvas {
                    id: "{canvas_id}",
                    class: "paint-canvas",
                    width: "{canvas_width}",
                    height: "{canvas_height}",
                    style: "background: white; cursor: crosshair; touch-action: none;",
                    onpointerdown: move |e| {
                        capture_pointer(&e, ".paint-canvas");
                        let (x, y) = pointer_offset(&e);
                        shell.app_input(&id_down, AppInput::PointerDown { x, y });
                    },
                    onpointermove: move |e| {
                        if !painting {
                            return;
                        }
                        let (x, y) = pointer_offset(&e);
                        shell.app_input(&id_move, AppInput::PointerMove { x, y });
                    },
                    onpointerup: move |e| {
                        release_pointer(&e, ".paint-canvas");
                        shell.app_input(&id_up, AppInput::PointerUp);
                    },
                    onpointerleave: move |_| {
                        if painting {
                            shell.app_input(&id_leave, AppInput::PointerLeave);
                        }
                    },
                }
            }
        }
    }
}
