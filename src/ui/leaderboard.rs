use ratatui::{
    layout::Constraint,
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::leaderboard::LeaderboardEntry;
use crate::theme::Palette;

const NAME_WIDTH: usize = 18;

/// Text cells for one board row: rank, name, score.
pub fn present_row(rank: usize, entry: &LeaderboardEntry, is_you: bool) -> [String; 3] {
    let mut name = truncate(&entry.username, NAME_WIDTH);
    if is_you {
        name.push_str(" (you)");
    }
    [format!("#{}", rank + 1), name, entry.score.to_string()]
}

/// Cuts `s` to at most `max` display columns, marking the cut with an ellipsis.
pub fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

pub fn table<'a>(entries: &[LeaderboardEntry], you: Option<usize>, palette: &Palette) -> Table<'a> {
    let header = Row::new(vec![Cell::from("Rank"), Cell::from("Player"), Cell::from("Score")])
        .style(
            Style::default()
                .fg(palette.secondary)
                .add_modifier(Modifier::BOLD),
        );

    let rows: Vec<Row> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let is_you = you == Some(i);
            let style = if is_you {
                Style::default()
                    .fg(palette.primary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.text)
            };
            Row::new(present_row(i, entry, is_you).map(Cell::from)).style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Min(NAME_WIDTH as u16 + 6),
        Constraint::Length(6),
    ];

    Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Leaderboard"))
}
