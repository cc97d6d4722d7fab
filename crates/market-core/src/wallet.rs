//! Wallet balance and transaction log.

use serde::{Deserialize, Serialize};

use crate::balance::balance_history;

/// Kind of wallet movement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Purchase,
    Sale,
}

impl TransactionType {
    /// Deposits and sales credit the wallet.
    pub fn is_income(self) -> bool {
        matches!(self, TransactionType::Deposit | TransactionType::Sale)
    }
}

/// One immutable wallet entry. `amount` is signed: positive is a credit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: TransactionType,

    pub title: String,

    /// Display date as provided by the source.
    pub date: String,

    pub amount: f64,
}

/// Current balance plus the transaction log, most recent first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Wallet {
    pub balance: f64,

    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Wallet {
    pub fn new(balance: f64, transactions: Vec<Transaction>) -> Self {
        Wallet { balance, transactions }
    }

    /// Chronological running balance ending at the current balance.
    pub fn history(&self) -> Vec<f64> {
        balance_history(self.balance, &self.transactions)
    }
}
