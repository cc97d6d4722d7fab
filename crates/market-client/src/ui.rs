// crates/market-client/src/ui.rs

use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use market_server::DataOrigin;

use crate::app::{App, Overlay, Panel};
use crate::components::{
    alert_editor::draw_alert_editor,
    help::draw_help,
    market_list::{draw_listing_detail, draw_market_list},
    notifications::draw_notifications,
    offer_entry::draw_offer_entry,
    profile_editor::draw_profile_editor,
    status_bar::draw_status_bar,
    wallet::draw_wallet,
    welcome::draw_welcome,
};
use crate::config::Theme;

/// Colours derived from the configured theme.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub accent: Color,
    pub text: Color,
    pub muted: Color,
    pub highlight: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Palette {
                accent: Color::Green,
                text: Color::White,
                muted: Color::Gray,
                highlight: Color::DarkGray,
            },
            Theme::Light => Palette {
                accent: Color::Blue,
                text: Color::Black,
                muted: Color::DarkGray,
                highlight: Color::Gray,
            },
        }
    }
}

pub fn draw(f: &mut Frame, app: &App) {
    let palette = Palette::for_theme(app.theme());
    let size = f.size();

    if !app.is_logged_in() {
        draw_welcome(f, size, app, &palette);
        draw_notifications(f, size, app);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Status bar
        ])
        .split(size);

    draw_header(f, chunks[0], app, &palette);
    draw_main_content(f, chunks[1], app, &palette);
    draw_status_bar(f, chunks[2], app, &palette);

    match &app.overlay {
        Overlay::None => {}
        Overlay::Help => draw_help(f, centered_rect(60, 70, size), &palette),
        Overlay::AlertEditor(editor) => {
            draw_alert_editor(f, centered_rect(50, 40, size), editor, &palette)
        }
        Overlay::Offer(form) => draw_offer_entry(
            f,
            centered_rect(50, 50, size),
            form,
            app.offer_listing().as_ref(),
            &palette,
        ),
        Overlay::Profile(editor) => {
            draw_profile_editor(f, centered_rect(50, 60, size), editor, &palette)
        }
    }

    // Toasts sit above everything else.
    draw_notifications(f, size, app);
}

fn draw_header(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(35),
            Constraint::Percentage(25),
        ])
        .split(area);

    let (farmer, farm) = match app.session.profile() {
        Some(p) => (p.name.as_str(), p.farm.name.as_str()),
        None => ("", ""),
    };
    let left = Paragraph::new(Line::from(vec![
        Span::styled(
            "AgriMarket",
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled(farmer, Style::default().fg(palette.text)),
        Span::styled(format!(" ({farm})"), Style::default().fg(palette.muted)),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(left, header_chunks[0]);

    let source = match app.data_origin {
        Some(DataOrigin::Source) => Span::styled("live data", Style::default().fg(Color::Green)),
        Some(DataOrigin::Fallback) => Span::styled("offline data", Style::default().fg(Color::Yellow)),
        None => Span::styled("loading...", Style::default().fg(palette.muted)),
    };
    let updated = app
        .last_update()
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string());
    let center = Paragraph::new(Line::from(vec![
        source,
        Span::raw(format!(" | Ticks: {} | Updated: {}", app.tick_count(), updated)),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(center, header_chunks[1]);

    let clock = Paragraph::new(Local::now().format("%a %d %b  %H:%M:%S").to_string())
        .style(Style::default().fg(palette.muted))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(clock, header_chunks[2]);
}

fn draw_main_content(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    match app.panel {
        Panel::Market => {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
                .split(area);
            draw_market_list(f, chunks[0], app, palette);
            draw_listing_detail(f, chunks[1], app, palette);
        }
        Panel::Wallet => draw_wallet(f, area, app, palette),
    }
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
