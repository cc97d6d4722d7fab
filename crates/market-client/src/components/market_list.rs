// crates/market-client/src/components/market_list.rs

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use market_core::format_currency;

use crate::app::{App, InputMode, PriceMove};
use crate::ui::Palette;

pub fn draw_market_list(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let header = Row::new(vec!["", "Crop", "Farm", "Region", "Price", "Unit", "Chg", "Alert"])
        .style(Style::default().fg(palette.muted).add_modifier(Modifier::BOLD));

    let alert_ids = app.alert_ids();
    let listings = app.visible_listings();

    let rows: Vec<Row> = listings
        .iter()
        .map(|listing| {
            let style = Style::default();

            let (arrow, move_style) = match app.price_move(&listing.id) {
                PriceMove::Up => ("▲", style.fg(Color::Green)),
                PriceMove::Down => ("▼", style.fg(Color::Red)),
                PriceMove::Flat => (" ", style),
            };
            let change_style = if listing.price_change >= 0.0 {
                style.fg(Color::Green)
            } else {
                style.fg(Color::Red)
            };
            let bell = if alert_ids.contains(&listing.id) { "🔔" } else { "" };

            Row::new(vec![
                Cell::from(arrow).style(move_style),
                Cell::from(listing.name.clone()).style(style.fg(palette.text)),
                Cell::from(listing.farm.clone()).style(style),
                Cell::from(listing.region.clone()).style(style),
                Cell::from(format_currency(listing.price)).style(move_style),
                Cell::from(listing.price_unit.clone()).style(style),
                Cell::from(format!("{:+.1}%", listing.price_change)).style(change_style),
                Cell::from(bell).style(style.fg(Color::Yellow)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(1),  // Move
        Constraint::Min(14),    // Crop
        Constraint::Length(18), // Farm
        Constraint::Length(10), // Region
        Constraint::Length(16), // Price
        Constraint::Length(9),  // Unit
        Constraint::Length(6),  // Change
        Constraint::Length(5),  // Alert
    ];

    let title = if app.search.is_empty() && !matches!(app.input_mode, InputMode::Editing) {
        " Market ".to_string()
    } else {
        format!(" Market - search: {} ({}) ", app.search, listings.len())
    };

    let table = Table::new(rows, widths)
        .header(header)
        .highlight_style(Style::default().bg(palette.highlight))
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent)),
        );

    // Offset is recomputed each frame so the selection stays in view.
    let mut state = TableState::default().with_selected(Some(app.selected));
    f.render_stateful_widget(table, area, &mut state);
}

/// Detail pane for the selected listing, enriched with crop details when
/// the data source provided them.
pub fn draw_listing_detail(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let block = Block::default()
        .title(" Details ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.muted));

    let Some(listing) = app.selected_listing() else {
        let empty = Paragraph::new("No listing selected")
            .style(Style::default().fg(palette.muted))
            .block(block);
        f.render_widget(empty, area);
        return;
    };

    let label = Style::default().fg(palette.muted);
    let mut lines = vec![
        Line::from(Span::styled(
            listing.name.clone(),
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("Price: ", label),
            Span::raw(format!("{} {}", format_currency(listing.price), listing.price_unit)),
        ]),
        Line::from(vec![
            Span::styled("Farm: ", label),
            Span::raw(format!("{}, {} {}", listing.farm, listing.region, listing.country)),
        ]),
        Line::from(vec![
            Span::styled("Grade: ", label),
            Span::raw(listing.grade.clone()),
            Span::styled("  Posted: ", label),
            Span::raw(listing.posted_time.clone()),
        ]),
    ];

    if let Some(alert) = app.selected_alert() {
        lines.push(Line::from(vec![
            Span::styled("Alert: ", label),
            Span::styled(
                format!("{} {}", alert.condition.as_str(), format_currency(alert.target_price)),
                Style::default().fg(Color::Yellow),
            ),
        ]));
    }

    if let Some(details) = app.data.as_ref().and_then(|d| d.details(&listing.id)) {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Origin: ", label),
            Span::raw(details.origin.clone()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Available: ", label),
            Span::raw(details.available.clone()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Seller: ", label),
            Span::raw(format!(
                "{} ({:.1}★, {} reviews)",
                details.seller.name, details.seller.rating, details.seller.reviews
            )),
        ]));
        for spec in &details.specifications {
            lines.push(Line::from(vec![
                Span::styled(format!("{}: ", spec.label), label),
                Span::raw(spec.value.clone()),
            ]));
        }
        if !details.description.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(details.description.clone()));
        }
    }

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
