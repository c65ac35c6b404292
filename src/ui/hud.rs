use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::config::Theme;
use crate::game::GameState;

/// Renders the one-line HUD and returns the remaining play area below it.
#[must_use]
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, state: &GameState, theme: &Theme) -> Rect {
    let [hud_area, play_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
    let [score_area, status_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .areas(hud_area);

    frame.render_widget(
        Paragraph::new(score_line(state.score, theme.hud_score)).alignment(Alignment::Left),
        score_area,
    );
    frame.render_widget(
        Paragraph::new(status_line(state.speed_level, state.snake.len()))
            .alignment(Alignment::Right)
            .style(Style::default().fg(theme.hud_status)),
        status_area,
    );

    play_area
}

fn score_line(score: u32, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::raw("Score: "),
        Span::styled(
            score.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ])
}

fn status_line(level: u32, length: usize) -> Line<'static> {
    Line::from(format!("Level: {level} │ Length: {length}"))
}
