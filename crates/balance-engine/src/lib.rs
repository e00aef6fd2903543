pub mod engine;
pub mod transaction;

use std::collections::BTreeMap;

use engine::{EngineError, Ledger, OverdrawPolicy};
use transaction::{BalanceSnapshot, Transaction};

/// Partition a flat transaction feed by address and run each address's
/// sequence through its own [`Ledger`].
///
/// Within each address the transactions are stably sorted by timestamp, so
/// equal-timestamp rows keep their input order. Output is one snapshot per
/// input transaction, per-address runs concatenated in ascending address
/// order. Addresses never share state, so feeding two addresses together
/// or separately yields identical per-address snapshot sequences.
pub fn process_feed(
    transactions: Vec<Transaction>,
    policy: OverdrawPolicy,
) -> Result<Vec<BalanceSnapshot>, EngineError> {
    let mut by_address: BTreeMap<String, Vec<Transaction>> = BTreeMap::new();
    for tx in transactions {
        by_address.entry(tx.address.clone()).or_default().push(tx);
    }

    let mut snapshots = Vec::new();
    for mut group in by_address.into_values() {
        group.sort_by_key(|tx| tx.timestamp);

        let mut ledger = Ledger::with_policy(policy);
        for tx in &group {
            snapshots.push(ledger.apply(tx)?);
        }
    }

    Ok(snapshots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn tx(address: &str, minute: u32, amount: i64, price: i64) -> Transaction {
        Transaction {
            address: address.to_owned(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 0, minute, 0).unwrap(),
            amount: Decimal::new(amount, 1),
            price: Decimal::new(price, 1),
        }
    }

    fn balances_for<'a>(
        snapshots: &'a [BalanceSnapshot],
        address: &str,
    ) -> Vec<&'a BalanceSnapshot> {
        snapshots
            .iter()
            .filter(|s| s.address == address)
            .collect()
    }

    #[test]
    fn test_grouping_independence() {
        let interleaved = vec![
            tx("a", 0, 100, 10),
            tx("b", 0, 40, 20),
            tx("a", 1, -50, 30),
            tx("b", 1, -40, 10),
            tx("a", 2, 20, 20),
        ];
        let only_a: Vec<_> = interleaved
            .iter()
            .filter(|t| t.address == "a")
            .cloned()
            .collect();

        let merged = process_feed(interleaved, OverdrawPolicy::Absorb).unwrap();
        let isolated = process_feed(only_a, OverdrawPolicy::Absorb).unwrap();

        assert_eq!(balances_for(&merged, "a"), isolated.iter().collect::<Vec<_>>());
        assert_eq!(merged.len(), 5);
    }

    #[test]
    fn test_address_order() {
        let snapshots = process_feed(
            vec![tx("b", 0, 10, 10), tx("a", 0, 10, 10)],
            OverdrawPolicy::Absorb,
        )
        .unwrap();

        let order: Vec<_> = snapshots.iter().map(|s| s.address.as_str()).collect();
        assert_eq!(order, ["a", "b"]);
    }

    #[test]
    fn test_timestamp_resort() {
        // The -5.0 disposal is listed first but happens at minute 2, after
        // both acquisitions; sorting must put it last.
        let snapshots = process_feed(
            vec![tx("a", 2, -50, 40), tx("a", 0, 30, 10), tx("a", 1, 40, 20)],
            OverdrawPolicy::Absorb,
        )
        .unwrap();

        let balances: Vec<_> = snapshots.iter().map(|s| s.realized_balance).collect();
        assert_eq!(
            balances,
            [
                Decimal::new(30, 1),  // 3.0 * 1.0
                Decimal::new(110, 1), // 3.0 + 4.0 * 2.0
                Decimal::new(80, 1),  // 4-lot drained, 3-lot cut to 2.0 @ 4.0
            ]
        );
    }

    #[test]
    fn test_strict_policy_propagates() {
        let result = process_feed(
            vec![tx("a", 0, 10, 10), tx("a", 1, -90, 10)],
            OverdrawPolicy::Strict,
        );
        assert!(matches!(result, Err(EngineError::Overdrawn { .. })));
    }

    #[test]
    fn test_empty_feed() {
        let snapshots = process_feed(Vec::new(), OverdrawPolicy::Absorb).unwrap();
        assert!(snapshots.is_empty());
    }
}
