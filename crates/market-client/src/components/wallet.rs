// crates/market-client/src/components/wallet.rs

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table},
    Frame,
};

use market_core::{format_currency, format_signed_currency, trend_points, ChartBox, Wallet};

use crate::app::App;
use crate::ui::Palette;

/// Chart space the trend line is laid out in before being flipped into
/// ratatui's bottom-up coordinates.
const CHART: ChartBox = ChartBox {
    width: 100.0,
    height: 100.0,
    padding: 2.0,
};

pub fn draw_wallet(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let block = Block::default()
        .title(" Wallet ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent));

    let Some(wallet) = app.data.as_ref().map(|d| &d.wallet) else {
        let loading = Paragraph::new("Loading wallet...")
            .style(Style::default().fg(palette.muted))
            .block(block);
        f.render_widget(loading, area);
        return;
    };

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),      // Balance
            Constraint::Percentage(45), // Trend
            Constraint::Min(4),         // Transactions
        ])
        .split(inner);

    let balance = Paragraph::new(Line::from(vec![
        Span::styled("Balance: ", Style::default().fg(palette.muted)),
        Span::styled(
            format_currency(wallet.balance),
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        ),
    ]));
    f.render_widget(balance, chunks[0]);

    draw_trend(f, chunks[1], wallet, palette);
    draw_transactions(f, chunks[2], wallet, palette);
}

fn draw_trend(f: &mut Frame, area: Rect, wallet: &Wallet, palette: &Palette) {
    let block = Block::default()
        .title(" Balance trend ")
        .borders(Borders::TOP)
        .border_style(Style::default().fg(palette.muted));

    let Some(points) = trend_points(&wallet.history(), CHART) else {
        let empty = Paragraph::new("Not enough history")
            .style(Style::default().fg(palette.muted))
            .block(block);
        f.render_widget(empty, area);
        return;
    };

    // Trend points grow downwards; the chart's y axis grows upwards.
    let points: Vec<(f64, f64)> = points
        .into_iter()
        .map(|(x, y)| (x, CHART.height - y))
        .collect();

    let dataset = Dataset::default()
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(palette.accent))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(Axis::default().bounds([0.0, CHART.width]))
        .y_axis(Axis::default().bounds([0.0, CHART.height]));
    f.render_widget(chart, area);
}

fn draw_transactions(f: &mut Frame, area: Rect, wallet: &Wallet, palette: &Palette) {
    let header = Row::new(vec!["Date", "Description", "Amount"])
        .style(Style::default().fg(palette.muted).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = wallet
        .transactions
        .iter()
        .map(|t| {
            let amount_style = if t.kind.is_income() {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Red)
            };
            Row::new(vec![
                Cell::from(t.date.clone()),
                Cell::from(t.title.clone()),
                Cell::from(format_signed_currency(t.amount)).style(amount_style),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(14),
        Constraint::Min(20),
        Constraint::Length(18),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(" Transactions ")
            .borders(Borders::TOP)
            .border_style(Style::default().fg(palette.muted)),
    );
    f.render_widget(table, area);
}
