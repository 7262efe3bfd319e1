//! Per-user operation history.

use std::collections::HashMap;

use chrono::NaiveDate;
use commission_common::{Operation, UserId, Week};

/// All ingested operations grouped by user, each user's sequence kept in
/// ingestion order (not date order).
#[derive(Debug, Default, Clone)]
pub struct OperationStore {
    by_user: HashMap<UserId, Vec<Operation>>,
    len: usize,
}

impl OperationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store by recording every operation in order.
    pub fn from_operations<'a>(operations: impl IntoIterator<Item = &'a Operation>) -> Self {
        let mut store = Self::new();
        for op in operations {
            store.record(op.clone());
        }
        store
    }

    /// Append `op` to its user's history.
    pub fn record(&mut self, op: Operation) {
        self.by_user.entry(op.user_id).or_default().push(op);
        self.len += 1;
    }

    /// Operations recorded for `user_id`, in ingestion order.
    pub fn operations_for(&self, user_id: UserId) -> &[Operation] {
        self.by_user.get(&user_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Count the user's withdrawals dated inside the Monday to Sunday week
    /// containing `reference_date`.
    ///
    /// Scans the user's whole recorded history, so withdrawals that appear
    /// later in the input but fall in the same week are counted as well.
    pub fn withdrawals_in_week(&self, user_id: UserId, reference_date: NaiveDate) -> usize {
        let week = Week::containing(reference_date);
        self.operations_for(user_id)
            .iter()
            .filter(|op| op.is_withdrawal() && week.contains(op.date))
            .count()
    }

    /// Total number of recorded operations.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct users seen.
    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commission_common::{Currency, Money, OperationType, UserType};
    use rust_decimal_macros::dec;

    fn op(date: &str, user: u64, operation_type: OperationType) -> Operation {
        Operation::new(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            UserId::new(user),
            UserType::Private,
            operation_type,
            Money::new(dec!(100), Currency::eur()),
        )
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_record_groups_by_user_in_order() {
        let mut store = OperationStore::new();
        store.record(op("2016-01-06", 1, OperationType::Withdraw));
        store.record(op("2016-01-05", 2, OperationType::Deposit));
        store.record(op("2016-01-01", 1, OperationType::Deposit));

        assert_eq!(store.len(), 3);
        assert_eq!(store.user_count(), 2);

        let dates: Vec<_> = store
            .operations_for(UserId::new(1))
            .iter()
            .map(|o| o.date)
            .collect();
        assert_eq!(dates, vec![date("2016-01-06"), date("2016-01-01")]);
    }

    #[test]
    fn test_unknown_user_has_no_history() {
        let store = OperationStore::new();

        assert!(store.is_empty());
        assert!(store.operations_for(UserId::new(7)).is_empty());
        assert_eq!(store.withdrawals_in_week(UserId::new(7), date("2016-01-06")), 0);
    }

    #[test]
    fn test_counts_only_withdrawals_in_same_week() {
        let ops = vec![
            op("2016-01-04", 1, OperationType::Withdraw), // Monday
            op("2016-01-06", 1, OperationType::Deposit),
            op("2016-01-10", 1, OperationType::Withdraw), // Sunday
            op("2016-01-03", 1, OperationType::Withdraw), // previous Sunday
            op("2016-01-11", 1, OperationType::Withdraw), // next Monday
            op("2016-01-06", 2, OperationType::Withdraw), // other user
        ];
        let store = OperationStore::from_operations(&ops);

        assert_eq!(store.withdrawals_in_week(UserId::new(1), date("2016-01-06")), 2);
        assert_eq!(store.withdrawals_in_week(UserId::new(1), date("2016-01-04")), 2);
        assert_eq!(store.withdrawals_in_week(UserId::new(1), date("2016-01-10")), 2);
        assert_eq!(store.withdrawals_in_week(UserId::new(1), date("2016-01-03")), 1);
        assert_eq!(store.withdrawals_in_week(UserId::new(2), date("2016-01-06")), 1);
    }

    #[test]
    fn test_week_spanning_new_year() {
        let ops = vec![
            op("2014-12-31", 4, OperationType::Withdraw),
            op("2015-01-01", 4, OperationType::Withdraw),
        ];
        let store = OperationStore::from_operations(&ops);

        assert_eq!(store.withdrawals_in_week(UserId::new(4), date("2014-12-31")), 2);
        assert_eq!(store.withdrawals_in_week(UserId::new(4), date("2015-01-04")), 2);
    }

    #[test]
    fn test_later_rows_with_earlier_dates_are_visible() {
        let mut store = OperationStore::new();
        store.record(op("2016-01-08", 1, OperationType::Withdraw));
        assert_eq!(store.withdrawals_in_week(UserId::new(1), date("2016-01-08")), 1);

        store.record(op("2016-01-05", 1, OperationType::Withdraw));
        assert_eq!(store.withdrawals_in_week(UserId::new(1), date("2016-01-08")), 2);
    }
}
