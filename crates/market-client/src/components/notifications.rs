// crates/market-client/src/components/notifications.rs

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use market_core::NotificationPhase;

use crate::app::App;

const TOAST_WIDTH: u16 = 44;
const TOAST_HEIGHT: u16 = 3;

/// Stack the notification queue in the top-right corner, oldest first.
pub fn draw_notifications(f: &mut Frame, area: Rect, app: &App) {
    let width = TOAST_WIDTH.min(area.width);
    let x = area.x + area.width - width;
    let mut y = area.y + 1;

    for message in app.notifications.messages() {
        if y + TOAST_HEIGHT > area.y + area.height {
            break;
        }
        let toast = Rect {
            x,
            y,
            width,
            height: TOAST_HEIGHT,
        };

        // Exiting toasts fade to grey until they are removed.
        let style = match message.phase {
            NotificationPhase::Visible => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            NotificationPhase::Exiting => Style::default().fg(Color::DarkGray),
        };

        f.render_widget(Clear, toast);
        let paragraph = Paragraph::new(message.message.as_str())
            .style(style)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).border_style(style));
        f.render_widget(paragraph, toast);

        y += TOAST_HEIGHT;
    }
}
