// crates/market-client/src/components/status_bar.rs

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, InputMode, Panel};
use crate::ui::Palette;

pub fn draw_status_bar(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let (msg, style) = match app.input_mode {
        InputMode::Normal => {
            let mut shortcuts = vec![
                Span::styled("[Tab]", Style::default().fg(Color::Blue)),
                Span::raw(match app.panel {
                    Panel::Market => " Wallet ",
                    Panel::Wallet => " Market ",
                }),
            ];
            if app.panel == Panel::Market {
                shortcuts.extend([
                    Span::styled("[A]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                    Span::raw("lert "),
                    Span::styled("[O]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                    Span::raw("ffer "),
                    Span::styled("[/]", Style::default().fg(Color::Cyan)),
                    Span::raw("Search "),
                ]);
            }
            shortcuts.extend([
                Span::styled("[X]", Style::default().fg(Color::Magenta)),
                Span::raw("Dismiss "),
                Span::styled("[P]", Style::default().fg(Color::Blue)),
                Span::raw("rofile "),
                Span::styled("[L]", Style::default().fg(palette.muted)),
                Span::raw("ogout "),
                Span::styled("[Q]", Style::default().fg(palette.muted)),
                Span::raw("uit"),
            ]);
            (Line::from(shortcuts), Style::default())
        }
        InputMode::Editing => {
            let input = vec![
                Span::raw("Search: "),
                Span::styled(app.search.as_str(), Style::default().fg(Color::Yellow)),
                Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
                Span::raw(" [Enter] Keep [Esc] Clear"),
            ];
            (Line::from(input), Style::default().fg(Color::Yellow))
        }
    };

    let status_block = Block::default().borders(Borders::ALL).border_style(style);

    let paragraph = Paragraph::new(msg)
        .block(status_block)
        .alignment(Alignment::Center);

    f.render_widget(paragraph, area);
}
