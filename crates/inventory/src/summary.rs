//! Stock valuation over an owner's live records.

use serde::{Deserialize, Serialize};

use stockledger_core::Money;

use crate::audit::RecordSnapshot;

/// Totals over live records.
///
/// - `total_capital`: Σ capitalPrice × quantity
/// - `total_selling`: Σ sellingPrice × quantity
/// - `projected_profit`: total_selling − total_capital (signed)
/// - `sales_so_far`: Σ used × sellingPrice
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySummary {
    pub items: usize,
    pub total_quantity: u64,
    pub total_used: u64,
    pub total_remaining: u64,
    pub total_capital: Money,
    pub total_selling: Money,
    pub projected_profit: i64,
    pub sales_so_far: Money,
}

impl InventorySummary {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a RecordSnapshot>) -> Self {
        let mut summary = records.into_iter().fold(Self::default(), |mut acc, r| {
            acc.items += 1;
            acc.total_quantity = acc.total_quantity.saturating_add(r.quantity);
            acc.total_used = acc.total_used.saturating_add(r.used);
            acc.total_remaining = acc.total_remaining.saturating_add(r.remaining());
            acc.total_capital = acc.total_capital.saturating_add(r.capital_price.times(r.quantity));
            acc.total_selling = acc.total_selling.saturating_add(r.selling_price.times(r.quantity));
            acc.sales_so_far = acc.sales_so_far.saturating_add(r.selling_price.times(r.used));
            acc
        });
        summary.projected_profit = summary.total_selling.signed_diff(summary.total_capital);
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use stockledger_core::{OwnerId, RecordId};

    fn rec(quantity: u64, used: u64, capital: u64, selling: u64) -> RecordSnapshot {
        let now = Utc::now();
        RecordSnapshot {
            id: RecordId::new(),
            owner: OwnerId::new(),
            name: "x".to_string(),
            category: None,
            quantity,
            used,
            capital_price: Money::new(capital),
            selling_price: Money::new(selling),
            image: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn totals_match_hand_computation() {
        let records = [rec(100, 30, 10, 15), rec(10, 10, 50, 40)];
        let s = InventorySummary::from_records(&records);

        assert_eq!(s.items, 2);
        assert_eq!(s.total_quantity, 110);
        assert_eq!(s.total_used, 40);
        assert_eq!(s.total_remaining, 70);
        assert_eq!(s.total_capital, Money::new(1000 + 500));
        assert_eq!(s.total_selling, Money::new(1500 + 400));
        assert_eq!(s.projected_profit, 400);
        assert_eq!(s.sales_so_far, Money::new(450 + 400));
    }

    #[test]
    fn empty_inventory_is_all_zero() {
        assert_eq!(InventorySummary::from_records(&Vec::<RecordSnapshot>::new()), InventorySummary::default());
    }
}
