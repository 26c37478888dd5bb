use dioxus::prelude::*;
use serde::Deserialize;
use shared_types::AppInput;
use web_sys::CanvasRenderingContext2d;

use crate::desktop::state::ShellHandle;
use crate::interop::canvas_context;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
struct CellView {
    x: i32,
    y: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Board {
    snake: Vec<CellView>,
    food: CellView,
    game_over: bool,
    grid: Grid,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
struct Grid {
    tiles: i32,
    cell: i32,
}

fn board_from_props(props: &serde_json::Value) -> Option<Board> {
    serde_json::from_value(props.clone()).ok()
}

fn draw(ctx: &CanvasRenderingContext2d, board: &Board) {
    let cell = board.grid.cell as f64;
    let size = (board.grid.tiles * board.grid.cell) as f64;

    ctx.set_fill_style_str("black");
    ctx.fill_rect(0.0, 0.0, size, size);

    ctx.set_fill_style_str("red");
    ctx.fill_rect(
        board.food.x as f64 * cell,
        board.food.y as f64 * cell,
        cell - 2.0,
        cell - 2.0,
    );

    ctx.set_fill_style_str("lime");
    for part in &board.snake {
        ctx.fill_rect(
            part.x as f64 * cell,
            part.y as f64 * cell,
            cell - 2.0,
            cell - 2.0,
        );
    }

    if board.game_over {
        ctx.set_fill_style_str("white");
        ctx.set_font("30px sans-serif");
        ctx.set_text_align("center");
        let _ = ctx.fill_text("Game Over!", size / 2.0, size / 2.0);
    }
}

#[component]
pub fn SnakeView(window_id: String, props: serde_json::Value, shell: ShellHandle) -> Element {
    let score = props["score"].as_u64().unwrap_or(0);
    let running = props["running"].as_bool().unwrap_or(false);
    let game_over = props["game_over"].as_bool().unwrap_or(false);
    let canvas_size =
        props["grid"]["tiles"].as_i64().unwrap_or(15) * props["grid"]["cell"].as_i64().unwrap_or(20);
    let canvas_id = format!("{window_id}-board");

    {
        let canvas_id = canvas_id.clone();
        use_effect(use_reactive((&props,), move |(props,)| {
            let Some(board) = board_from_props(&props) else {
                return;
            };
            if let Some(ctx) = canvas_context(&canvas_id) {
                draw(&ctx, &board);
            }
        }));
    }

    rsx! {
        div {
            class: "snake-game-app",
            style: "display: flex; flex-direction: column; align-items: center; gap: 0.375rem; height: 100%; padding: 0.5rem; background: #ece9d8;",
            div {
                class: "snake-score",
                style: "font-size: 0.875rem; font-weight: 700;",
                "Score: {score}"
            }
            canvas {
                id: "{canvas_id}",
                width: "{canvas_size}",
                height: "{canvas_size}",
                style: "border: 2px solid #333;",
            }
            div {
                style: "display: flex; align-items: center; gap: 0.5rem; font-size: 0.75rem;",
                button {
                    onclick: move |_| shell.app_input(&window_id, AppInput::Restart),
                    "Restart Game"
                }
                if !running && !game_over {
                    span { style: "color: #555;", "Press an arrow key to start" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn board_parses_from_snapshot() {
        let props = json!({
            "snake": [{ "x": 7, "y": 7 }, { "x": 6, "y": 7 }],
            "food": { "x": 1, "y": 2 },
            "score": 10,
            "game_over": false,
            "running": true,
            "grid": { "tiles": 15, "cell": 20 },
        });
        let board = board_from_props(&props).unwrap();
        assert_eq!(board.snake.len(), 2);
        assert_eq!(board.food, CellView { x: 1, y: 2 });
        assert_eq!(board.grid.tiles * board.grid.cell, 300);
    }
}
