use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Signed token transfer record from CSV
///
/// A positive `amount` is an inbound transfer (acquisition), a negative
/// `amount` an outbound transfer (disposal). Transactions for one address
/// must reach the engine in non-decreasing timestamp order.
#[derive(Debug, Clone, Deserialize)]
pub struct Transaction {
    pub address: String,
    pub timestamp: DateTime<Utc>,
    pub amount: Decimal,
    pub price: Decimal,
}

/// Per-transaction output row: the mark-to-market value of what the
/// address is deemed still to be holding after this transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceSnapshot {
    pub address: String,
    pub timestamp: DateTime<Utc>,
    pub realized_balance: Decimal,
}
