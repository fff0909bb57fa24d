//! HTML rendering of a board for browsers.

use anyhow::{Context, Result};
use minijinja::{Environment, context};

use life::core::types::BoardState;

const BOARD_TEMPLATE: &str = include_str!("../templates/board.html");

/// Render `board` as a standalone HTML page.
pub fn render_board(board: &BoardState) -> Result<String> {
    let mut env = Environment::new();
    env.add_template("board.html", BOARD_TEMPLATE)
        .context("parse board template")?;

    let template = env.get_template("board.html")?;
    let rendered = template
        .render(context! {
            id => board.id.0,
            cells => &board.cells,
            generation => board.generation,
            is_final => board.is_final,
        })
        .context("render board template")?;
    Ok(rendered)
}
