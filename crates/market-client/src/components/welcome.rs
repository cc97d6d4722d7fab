// crates/market-client/src/components/welcome.rs

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::{centered_rect, Palette};

/// Signed-out screen.
pub fn draw_welcome(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let status = if app.data.is_some() {
        "Market data ready."
    } else {
        "Loading market data..."
    };

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "AgriMarket",
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from("Live crop prices, alerts and offers"),
        Line::from(""),
        Line::from(Span::styled(status, Style::default().fg(palette.muted))),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Enter]", Style::default().fg(palette.accent)),
            Span::raw(" log in   "),
            Span::styled("[Q]", Style::default().fg(palette.muted)),
            Span::raw(" quit"),
        ]),
    ];

    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, centered_rect(50, 40, area));
}
