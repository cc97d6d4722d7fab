// crates/market-client/src/components/alert_editor.rs

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use market_core::{format_currency, parse_positive_amount, AlertCondition};

use crate::app::AlertEditor;
use crate::ui::Palette;

pub fn draw_alert_editor(f: &mut Frame, area: Rect, editor: &AlertEditor, palette: &Palette) {
    f.render_widget(Clear, area);

    let action = if editor.existing { "Update alert" } else { "Set alert" };
    let block = Block::default()
        .title(format!(" {action}: {} ", editor.crop_name))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Current price
            Constraint::Length(2), // Condition
            Constraint::Length(2), // Target
            Constraint::Min(1),    // Hints
        ])
        .split(inner);

    let current = Paragraph::new(Line::from(vec![
        Span::styled("Current price: ", Style::default().fg(palette.muted)),
        Span::raw(format!(
            "{} {}",
            format_currency(editor.current_price),
            editor.price_unit
        )),
    ]));
    f.render_widget(current, chunks[0]);

    let option = |condition: AlertCondition, text: &'static str| {
        if editor.condition == condition {
            Span::styled(
                format!("[{text}]"),
                Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(format!(" {text} "), Style::default().fg(palette.muted))
        }
    };
    let condition = Paragraph::new(Line::from(vec![
        Span::styled("Notify when price is ", Style::default().fg(palette.muted)),
        option(AlertCondition::Above, "above"),
        Span::raw(" "),
        option(AlertCondition::Below, "below"),
    ]));
    f.render_widget(condition, chunks[1]);

    let valid = parse_positive_amount(&editor.target_input).is_some();
    let target = Paragraph::new(Line::from(vec![
        Span::styled("Target: ", Style::default().fg(palette.muted)),
        Span::styled(
            editor.target_input.as_str(),
            Style::default().fg(if valid { Color::Cyan } else { Color::Red }),
        ),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]));
    f.render_widget(target, chunks[2]);

    let mut hints = vec![
        Span::styled("[Tab]", Style::default().fg(Color::Blue)),
        Span::raw(" above/below  "),
        Span::styled("[Enter]", Style::default().fg(Color::Green)),
        Span::raw(" save  "),
    ];
    if editor.existing {
        hints.push(Span::styled("[Del]", Style::default().fg(Color::Red)));
        hints.push(Span::raw(" remove  "));
    }
    hints.push(Span::styled("[Esc]", Style::default().fg(Color::Gray)));
    hints.push(Span::raw(" cancel"));

    let hints = Paragraph::new(Line::from(hints)).alignment(Alignment::Center);
    f.render_widget(hints, chunks[3]);
}
