// crates/market-client/src/components/help.rs

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use crate::ui::Palette;

const SHORTCUTS: &[(&str, &str)] = &[
    ("↑/k ↓/j", "Move selection"),
    ("Tab", "Switch market / wallet"),
    ("/", "Search crops or farms"),
    ("A/a", "Set or edit a price alert"),
    ("O/o", "Make an offer"),
    ("X/x", "Dismiss latest notification"),
    ("P/p", "Edit your profile"),
    ("Shift+L", "Log out"),
    ("F1/?", "Toggle help"),
    ("Q/q", "Quit"),
];

pub fn draw_help(f: &mut Frame, area: Rect, palette: &Palette) {
    f.render_widget(Clear, area);

    let items: Vec<ListItem> = SHORTCUTS
        .iter()
        .map(|(keys, action)| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{keys:<10}"),
                    Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" - {action}")),
            ]))
        })
        .collect();

    let help_list = List::new(items).block(
        Block::default()
            .title(" Help - Keyboard Shortcuts ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(help_list, area);

    if area.height < 2 {
        return;
    }
    let footer = Paragraph::new("Press F1 or ESC to close help")
        .style(Style::default().fg(palette.muted))
        .alignment(Alignment::Center);
    let footer_area = Rect {
        x: area.x,
        y: area.y + area.height - 2,
        width: area.width,
        height: 1,
    };
    f.render_widget(footer, footer_area);
}
