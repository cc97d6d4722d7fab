// crates/market-client/src/components/offer_entry.rs

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use market_core::{format_currency, Listing, OfferForm, OfferStatus};

use crate::ui::Palette;

pub fn draw_offer_entry(
    f: &mut Frame,
    area: Rect,
    form: &OfferForm,
    listing: Option<&Listing>,
    palette: &Palette,
) {
    f.render_widget(Clear, area);

    let title = match listing {
        Some(l) => format!(" Make an offer: {} ", l.name),
        None => " Make an offer ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if form.status() == OfferStatus::Success {
        let done = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Offer submitted!",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )),
            Line::from("The seller will review your offer."),
            Line::from(""),
            Line::from(Span::styled("[Enter] close", Style::default().fg(palette.muted))),
        ])
        .alignment(Alignment::Center);
        f.render_widget(done, inner);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Market price
            Constraint::Length(2), // Quantity
            Constraint::Length(2), // Offer price
            Constraint::Length(4), // Totals
            Constraint::Min(1),    // Hints
        ])
        .split(inner);

    let label = Style::default().fg(palette.muted);

    if let Some(listing) = listing {
        let market = Paragraph::new(Line::from(vec![
            Span::styled("Market price: ", label),
            Span::raw(format!("{} {}", format_currency(listing.price), listing.price_unit)),
        ]));
        f.render_widget(market, chunks[0]);
    }

    let quantity = Paragraph::new(Line::from(vec![
        Span::styled("Quantity: ", label),
        Span::styled("[-] ", Style::default().fg(Color::Red)),
        Span::styled(
            form.quantity.get().to_string(),
            Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" [+]", Style::default().fg(Color::Green)),
    ]));
    f.render_widget(quantity, chunks[1]);

    let price_span = if form.price_input.is_empty() {
        Span::styled("enter your price per unit", Style::default().fg(palette.muted))
    } else {
        Span::styled(form.price_input.as_str(), Style::default().fg(Color::Cyan))
    };
    let price = Paragraph::new(Line::from(vec![
        Span::styled("Your price: ", label),
        price_span,
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]));
    f.render_widget(price, chunks[2]);

    let quote = form.quote();
    let totals = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Offer value:  ", label),
            Span::raw(format_currency(quote.total_offer_value)),
        ]),
        Line::from(vec![
            Span::styled("Platform fee: ", label),
            Span::raw(format_currency(quote.platform_fee)),
        ]),
        Line::from(vec![
            Span::styled("Total:        ", label),
            Span::styled(
                format_currency(quote.total),
                Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
            ),
        ]),
    ]);
    f.render_widget(totals, chunks[3]);

    let hints = match form.status() {
        OfferStatus::Submitting => Line::from(Span::styled(
            "Submitting...",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::SLOW_BLINK),
        )),
        _ => {
            let submit_style = if quote.can_submit() {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Line::from(vec![
                Span::styled("[Enter]", submit_style),
                Span::raw(" submit  "),
                Span::styled("[Esc]", Style::default().fg(Color::Gray)),
                Span::raw(" cancel"),
            ])
        }
    };
    f.render_widget(Paragraph::new(hints).alignment(Alignment::Center), chunks[4]);
}
