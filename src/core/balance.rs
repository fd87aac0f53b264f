//! Backward balance reconstruction from an anchor balance.
//!
//! Only the anchor (the balance as of now) is authoritative. Every earlier
//! balance is derived by undoing the transactions dated after it, so the
//! scan runs from the latest grid point and the latest transaction backward.

use crate::core::grid::SampleGrid;
use crate::core::records::{BalanceAnchor, Transaction};
use crate::core::series::{Series, SeriesPoint};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Reconstructs the balance at each grid point.
///
/// The value at `t` is `anchor - sum(amount of transactions dated after t)`,
/// so a grid point on a transaction's date already includes it.
/// Between transactions the balance is held constant; grid points before
/// the earliest transaction receive the fully unwound balance.
///
/// `transactions` and the grid must both be ascending by date.
pub fn generate(anchor: f64, transactions: &[&Transaction], grid: &SampleGrid) -> Vec<f64> {
    let xs = grid.points();
    let mut ys = Vec::with_capacity(xs.len());
    let mut balance = anchor;
    let mut grid_iter = xs.iter().rev().peekable();

    for trans in transactions.iter().rev() {
        while grid_iter.next_if(|x| **x >= trans.date).is_some() {
            ys.push(balance);
        }
        balance -= trans.amount;
    }
    ys.resize(xs.len(), balance);

    ys.reverse();
    ys
}

/// Balance series for every anchored account, keyed by account name.
///
/// Accounts that have transactions but no anchor are left out. When an
/// account has several anchors the last one wins.
pub fn generate_all(
    anchors: &[BalanceAnchor],
    transactions: &[Transaction],
    grid: &SampleGrid,
) -> BTreeMap<String, Series> {
    let mut by_account: HashMap<&str, Vec<&Transaction>> = HashMap::new();
    for trans in transactions {
        by_account.entry(trans.account.as_str()).or_default().push(trans);
    }

    let latest_anchor: BTreeMap<&str, f64> = anchors
        .iter()
        .map(|a| (a.account.as_str(), a.amount))
        .collect();

    let mut result = BTreeMap::new();
    for (&account, &amount) in &latest_anchor {
        let trans = by_account.get(account).map(Vec::as_slice).unwrap_or_default();
        let points = generate(amount, trans, grid)
            .into_iter()
            .map(SeriesPoint::Present)
            .collect();
        result.insert(account.to_string(), Series::new(account, points));
    }

    for (account, trans) in &by_account {
        if !latest_anchor.contains_key(account) {
            debug!(account, count = trans.len(), "Skipping account without anchor balance");
        }
    }
    result
}

/// Anchors derived from opening balances, one per opening record.
pub fn anchors_from_openings(
    openings: &[BalanceAnchor],
    transactions: &[Transaction],
) -> Vec<BalanceAnchor> {
    openings
        .iter()
        .map(|o| anchor_from_opening(&o.account, o.amount, transactions))
        .collect()
}

/// Current balance from an opening balance and the full transaction log.
pub fn anchor_from_opening(account: &str, opening: f64, transactions: &[Transaction]) -> BalanceAnchor {
    let delta: f64 = transactions
        .iter()
        .filter(|t| t.account == account)
        .map(|t| t.amount)
        .sum();
    BalanceAnchor {
        account: account.to_string(),
        amount: opening + delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::build_grid;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(day: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(day)
    }

    fn trans(account: &str, day: i64, amount: f64) -> Transaction {
        Transaction {
            date: at(day),
            account: account.to_string(),
            amount,
            content: None,
        }
    }

    fn grid(days: &[i64]) -> SampleGrid {
        // Evenly spaced days can be expressed through build_grid
        let first = days[0];
        let last = days[days.len() - 1];
        let grid = build_grid(at(first), at(last), days.len()).unwrap();
        assert_eq!(
            grid.points(),
            days.iter().map(|d| at(*d)).collect::<Vec<_>>().as_slice()
        );
        grid
    }

    #[test]
    fn test_reconstructs_step_balance() {
        let log = [trans("bank", 10, 200.0), trans("bank", 20, -50.0)];
        let refs: Vec<&Transaction> = log.iter().collect();
        let ys = generate(1000.0, &refs, &grid(&[5, 15, 25]));
        assert_eq!(ys, vec![850.0, 1050.0, 1000.0]);
    }

    #[test]
    fn test_grid_point_on_transaction_date_includes_it() {
        let log = [trans("bank", 10, 200.0)];
        let refs: Vec<&Transaction> = log.iter().collect();
        let ys = generate(1000.0, &refs, &grid(&[0, 10, 20]));
        assert_eq!(ys, vec![800.0, 1000.0, 1000.0]);
    }

    #[test]
    fn test_balance_before_all_transactions_is_fully_unwound() {
        let log = [
            trans("bank", 3, 10.0),
            trans("bank", 4, -30.0),
            trans("bank", 5, 7.5),
        ];
        let refs: Vec<&Transaction> = log.iter().collect();
        let ys = generate(500.0, &refs, &grid(&[0, 1, 2, 3, 4, 5, 6]));
        assert_eq!(ys[0], 500.0 - (10.0 - 30.0 + 7.5));
        assert_eq!(ys[6], 500.0);
    }

    #[test]
    fn test_transactions_after_last_grid_point_still_unwind() {
        let log = [trans("bank", 30, 100.0)];
        let refs: Vec<&Transaction> = log.iter().collect();
        let ys = generate(1000.0, &refs, &grid(&[0, 10]));
        assert_eq!(ys, vec![900.0, 900.0]);
    }

    #[test]
    fn test_zero_amounts_give_constant_series() {
        let log = [trans("bank", 2, 0.0), trans("bank", 8, 0.0)];
        let refs: Vec<&Transaction> = log.iter().collect();
        let ys = generate(42.0, &refs, &grid(&[0, 5, 10]));
        assert!(ys.iter().all(|y| *y == 42.0));
    }

    #[test]
    fn test_no_transactions_is_flat_anchor() {
        let ys = generate(7.0, &[], &grid(&[0, 1, 2]));
        assert_eq!(ys, vec![7.0, 7.0, 7.0]);
    }

    #[test]
    fn test_generate_all_skips_unanchored_accounts() {
        let log = vec![
            trans("bank", 10, 200.0),
            trans("card", 12, -20.0),
            trans("bank", 20, -50.0),
        ];
        let anchors = vec![BalanceAnchor {
            account: "bank".to_string(),
            amount: 1000.0,
        }];
        let series = generate_all(&anchors, &log, &grid(&[5, 15, 25]));
        assert_eq!(series.len(), 1);
        assert!(!series.contains_key("card"));
        assert_eq!(
            series["bank"].values(),
            vec![Some(850.0), Some(1050.0), Some(1000.0)]
        );
    }

    #[test]
    fn test_anchored_account_without_transactions() {
        let anchors = vec![BalanceAnchor {
            account: "cash".to_string(),
            amount: 30.0,
        }];
        let series = generate_all(&anchors, &[], &grid(&[0, 1]));
        assert_eq!(series["cash"].values(), vec![Some(30.0), Some(30.0)]);
    }

    #[test]
    fn test_last_anchor_wins_and_keeps_all_transactions() {
        let log = vec![trans("bank", 10, 200.0)];
        let anchors = vec![
            BalanceAnchor {
                account: "bank".to_string(),
                amount: 900.0,
            },
            BalanceAnchor {
                account: "bank".to_string(),
                amount: 1000.0,
            },
        ];
        let series = generate_all(&anchors, &log, &grid(&[0, 10, 20]));
        assert_eq!(series.len(), 1);
        assert_eq!(
            series["bank"].values(),
            vec![Some(800.0), Some(1000.0), Some(1000.0)]
        );
    }

    #[test]
    fn test_anchors_from_openings() {
        let log = vec![trans("bank", 1, 200.0), trans("bank", 3, -50.0)];
        let openings = vec![BalanceAnchor {
            account: "bank".to_string(),
            amount: 1000.0,
        }];
        let anchors = anchors_from_openings(&openings, &log);
        let series = generate_all(&anchors, &log, &grid(&[0, 2, 4]));
        // The unwound start equals the opening balance
        assert_eq!(
            series["bank"].values(),
            vec![Some(1000.0), Some(1200.0), Some(1150.0)]
        );
    }

    #[test]
    fn test_anchor_from_opening_balance() {
        let log = vec![trans("bank", 1, 200.0), trans("card", 2, -20.0), trans("bank", 3, -50.0)];
        let anchor = anchor_from_opening("bank", 1000.0, &log);
        assert_eq!(anchor.amount, 1150.0);
    }
}
