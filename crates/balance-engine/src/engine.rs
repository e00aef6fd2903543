use crate::transaction::{BalanceSnapshot, Transaction};
use rust_decimal::Decimal;
use thiserror::Error;

/// Parcel of previously acquired quantity, valued at its own price
///
/// The price starts as the acquisition price but is overwritten whenever a
/// disposal touches the lot: disposals "mark" the surviving remainder at
/// the disposal price rather than preserving the original cost basis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualLot {
    pub amount: Decimal,
    pub price: Decimal,
}

/// What to do when a disposal exceeds the total quantity held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverdrawPolicy {
    /// Drain every lot and carry on with an empty ledger
    #[default]
    Absorb,
    /// Fail the transaction and leave the ledger untouched
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("disposal of {requested} from {address} exceeds holdings of {held}")]
    Overdrawn {
        address: String,
        requested: Decimal,
        held: Decimal,
    },
}

/// Virtual-lot ledger for a single address
///
/// Owns the lots created by that address's acquisitions and consumes them
/// largest-first on disposal. One instance lives for exactly one address's
/// transaction sequence; ledgers never interact.
#[derive(Debug, Default)]
pub struct Ledger {
    lots: Vec<VirtualLot>,
    policy: OverdrawPolicy,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn with_policy(policy: OverdrawPolicy) -> Self {
        Self {
            lots: Vec::new(),
            policy,
        }
    }

    /// Apply one transaction and return the resulting balance snapshot.
    ///
    /// Transactions must arrive in non-decreasing timestamp order; the
    /// caller owns that guarantee. Errors only under
    /// [`OverdrawPolicy::Strict`].
    pub fn apply(&mut self, tx: &Transaction) -> Result<BalanceSnapshot, EngineError> {
        if tx.amount > Decimal::ZERO {
            self.acquire(tx.amount, tx.price);
        } else {
            self.dispose(-tx.amount, tx.price, &tx.address)?;
        }

        Ok(BalanceSnapshot {
            address: tx.address.clone(),
            timestamp: tx.timestamp,
            realized_balance: self.realized_balance(),
        })
    }

    /// Sum of remaining lot amounts, each valued at its recorded price
    pub fn realized_balance(&self) -> Decimal {
        self.lots.iter().map(|lot| lot.amount * lot.price).sum()
    }

    fn acquire(&mut self, amount: Decimal, price: Decimal) {
        self.lots.push(VirtualLot { amount, price });
    }

    /// Consume lots largest-first until `magnitude` is spent.
    ///
    /// Each disposal re-sorts the lots descending by amount, drains whole
    /// lots while the remaining magnitude covers them, then partially
    /// consumes at most one lot — revaluing it to the disposal price — and
    /// stops. Smaller lots past that point are untouched. A zero magnitude
    /// still revalues the largest lot through the partial path and is
    /// deliberately not special-cased as a no-op.
    fn dispose(
        &mut self,
        magnitude: Decimal,
        price: Decimal,
        address: &str,
    ) -> Result<(), EngineError> {
        if self.policy == OverdrawPolicy::Strict {
            let held: Decimal = self.lots.iter().map(|lot| lot.amount).sum();
            if magnitude > held {
                return Err(EngineError::Overdrawn {
                    address: address.to_owned(),
                    requested: magnitude,
                    held,
                });
            }
        }

        let mut remaining = magnitude;
        self.lots.sort_by(|a, b| b.amount.cmp(&a.amount));

        for lot in &mut self.lots {
            if remaining >= lot.amount {
                remaining -= lot.amount;
                lot.amount = Decimal::ZERO;
                lot.price = price;
            } else {
                lot.amount -= remaining;
                lot.price = price;
                break;
            }
        }

        // Leftover magnitude beyond total holdings is absorbed silently;
        // no negative lot is ever created.
        self.lots.retain(|lot| lot.amount > Decimal::ZERO);

        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn lots(&self) -> &[VirtualLot] {
        &self.lots
    }
}
