// crates/market-client/src/components/profile_editor.rs

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{ProfileEditor, ProfileField};
use crate::ui::Palette;

pub fn draw_profile_editor(f: &mut Frame, area: Rect, editor: &ProfileEditor, palette: &Palette) {
    f.render_widget(Clear, area);

    let mut lines: Vec<Line> = Vec::new();
    for (i, field) in ProfileField::ALL.iter().enumerate() {
        if *field == ProfileField::FarmName {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Farm",
                Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
            )));
        }

        let focused = i == editor.focus;
        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.muted)
        };
        let mut spans = vec![
            Span::styled(format!("{:<13}", field.label()), label_style),
            Span::styled(field.value(&editor.draft), Style::default().fg(palette.text)),
        ];
        if focused {
            spans.push(Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("[Tab]", Style::default().fg(Color::Blue)),
        Span::raw(" next field  "),
        Span::styled("[Enter]", Style::default().fg(Color::Green)),
        Span::raw(" save  "),
        Span::styled("[Esc]", Style::default().fg(Color::Gray)),
        Span::raw(" cancel"),
    ]));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" Edit profile ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.accent)),
    );
    f.render_widget(paragraph, area);
}
