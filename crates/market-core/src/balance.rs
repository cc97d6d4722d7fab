//! Running-balance reconstruction for the wallet trend line.

use crate::wallet::Transaction;

/// Rebuild the chronological balance series.
///
/// `transactions` are most recent first. The balance before the oldest
/// transaction is `balance - Σ amounts`; replaying oldest to newest from
/// there ends exactly at `balance`. The result has
/// `transactions.len() + 1` points.
pub fn balance_history(balance: f64, transactions: &[Transaction]) -> Vec<f64> {
    let total: f64 = transactions.iter().map(|t| t.amount).sum();
    let mut running = balance - total;

    let mut history = Vec::with_capacity(transactions.len() + 1);
    history.push(running);
    for tx in transactions.iter().rev() {
        running += tx.amount;
        history.push(running);
    }
    history
}

/// Drawing box for [`trend_points`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ChartBox {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Default for ChartBox {
    fn default() -> Self {
        ChartBox {
            width: 400.0,
            height: 64.0,
            padding: 2.0,
        }
    }
}

/// Map a balance series onto `chart`, y growing downward.
///
/// `None` when there are fewer than two points (nothing to draw). A
/// flat series is drawn along the bottom edge.
pub fn trend_points(history: &[f64], chart: ChartBox) -> Option<Vec<(f64, f64)>> {
    if history.len() < 2 {
        return None;
    }

    let max = history.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = history.iter().copied().fold(f64::INFINITY, f64::min);
    let range = if max - min == 0.0 { 1.0 } else { max - min };
    let last = (history.len() - 1) as f64;
    let inner_w = chart.width - chart.padding * 2.0;
    let inner_h = chart.height - chart.padding * 2.0;

    Some(
        history
            .iter()
            .enumerate()
            .map(|(i, balance)| {
                let x = (i as f64 / last) * inner_w + chart.padding;
                let y = chart.height - ((balance - min) / range) * inner_h - chart.padding;
                (x, y)
            })
            .collect(),
    )
}
