use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Block;

use crate::config::{
    BORDER_HALF_BLOCK, BoardGeometry, CELL_WIDTH, GLYPH_FOOD, GLYPH_SNAKE_BODY, GLYPH_SNAKE_HEAD,
    Theme,
};
use crate::game::GameState;
use crate::snake::Position;
use crate::ui::hud::render_hud;
use crate::ui::menu::{render_game_over_menu, render_pause_menu, render_start_menu};

/// Popup the driver wants on top of the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Overlay {
    None,
    Start,
    Pause,
}

/// Renders the full game frame from a snapshot.
pub fn render(
    frame: &mut Frame<'_>,
    state: &GameState,
    geometry: &BoardGeometry,
    overlay: Overlay,
    theme: &Theme,
) {
    let area = board_area(frame.area(), geometry);
    let play_area = render_hud(frame, area, state, theme);

    let block = Block::bordered()
        .border_set(BORDER_HALF_BLOCK)
        .border_style(Style::new().fg(theme.border_fg).bg(theme.play_bg))
        .style(Style::new().bg(theme.play_bg));

    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    render_food(frame, inner, geometry, state, theme);
    render_snake(frame, inner, geometry, state, theme);

    if state.is_over() {
        render_game_over_menu(
            frame,
            play_area,
            state.status,
            state.score,
            state.death_reason,
        );
        return;
    }

    match overlay {
        Overlay::Start => render_start_menu(frame, play_area, theme),
        Overlay::Pause => render_pause_menu(frame, play_area),
        Overlay::None => {}
    }
}

/// Centers the HUD row plus the bordered board inside `area`.
fn board_area(area: Rect, geometry: &BoardGeometry) -> Rect {
    let width = geometry
        .inner_columns()
        .saturating_mul(CELL_WIDTH)
        .saturating_add(2)
        .min(area.width);
    let height = geometry
        .inner_rows()
        .saturating_add(3)
        .min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_food(
    frame: &mut Frame<'_>,
    inner: Rect,
    geometry: &BoardGeometry,
    state: &GameState,
    theme: &Theme,
) {
    let Some(food) = state.food else {
        return;
    };
    let Some((x, y)) = cell_to_terminal(inner, geometry, food) else {
        return;
    };

    let buffer = frame.buffer_mut();
    buffer.set_string(x, y, GLYPH_FOOD, Style::new().fg(theme.food).bg(theme.play_bg));
}

fn render_snake(
    frame: &mut Frame<'_>,
    inner: Rect,
    geometry: &BoardGeometry,
    state: &GameState,
    theme: &Theme,
) {
    let buffer = frame.buffer_mut();
    // Tail first so the head wins when a collision stacks two segments.
    for (index, segment) in state.snake.iter().enumerate().rev() {
        let Some((x, y)) = cell_to_terminal(inner, geometry, *segment) else {
            continue;
        };

        if index == 0 {
            buffer.set_string(
                x,
                y,
                GLYPH_SNAKE_HEAD,
                Style::new()
                    .fg(theme.snake_head)
                    .add_modifier(Modifier::BOLD),
            );
        } else {
            buffer.set_string(x, y, GLYPH_SNAKE_BODY, Style::new().fg(theme.snake_body));
        }
    }
}

/// Maps a grid cell to the terminal cell of its left half, if visible.
fn cell_to_terminal(
    inner: Rect,
    geometry: &BoardGeometry,
    position: Position,
) -> Option<(u16, u16)> {
    let (column, row) = geometry.inner_offset(position)?;

    let x = inner.x.saturating_add(column.saturating_mul(CELL_WIDTH));
    let y = inner.y.saturating_add(row);
    if x.saturating_add(CELL_WIDTH) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
