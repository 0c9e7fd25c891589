use super::calculator::BillBreakdown;

/// Monotonic stamp for one cart/discount snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Revision(u64);

/// Holds the bill for the newest snapshot that has finished computing.
///
/// Recomputations may complete out of order; a result older than the one
/// already held is dropped.
///
/// Library API for front ends that recompute the bill as the cart or
/// discount changes. The CLI computes each bill once and does not need it.
#[derive(Debug, Default)]
pub struct LatestBill {
    issued: u64,
    current: Option<(Revision, BillBreakdown)>,
}

impl LatestBill {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp a new snapshot before computing it
    pub fn next_revision(&mut self) -> Revision {
        self.issued += 1;
        Revision(self.issued)
    }

    /// Returns false if the result was stale and discarded
    pub fn accept(&mut self, revision: Revision, bill: BillBreakdown) -> bool {
        if let Some((held, _)) = &self.current {
            if revision <= *held {
                return false;
            }
        }
        self.current = Some((revision, bill));
        true
    }

    pub fn current(&self) -> Option<&BillBreakdown> {
        self.current.as_ref().map(|(_, bill)| bill)
    }

    /// True once the newest issued snapshot has been accepted
    pub fn is_settled(&self) -> bool {
        matches!(&self.current, Some((rev, _)) if rev.0 == self.issued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bill(final_amount: f64) -> BillBreakdown {
        BillBreakdown {
            final_amount,
            ..BillBreakdown::default()
        }
    }

    #[test]
    fn newer_result_wins_over_late_stale_one() {
        let mut latest = LatestBill::new();
        let first = latest.next_revision();
        let second = latest.next_revision();

        assert!(latest.accept(second, bill(200.0)));
        assert!(!latest.accept(first, bill(100.0)));
        assert_eq!(latest.current().map(|b| b.final_amount), Some(200.0));
        assert!(latest.is_settled());
    }

    #[test]
    fn in_order_results_replace_each_other() {
        let mut latest = LatestBill::new();
        assert!(latest.current().is_none());

        let first = latest.next_revision();
        assert!(latest.accept(first, bill(100.0)));
        let second = latest.next_revision();
        assert!(!latest.is_settled());
        assert!(latest.accept(second, bill(150.0)));
        assert_eq!(latest.current().map(|b| b.final_amount), Some(150.0));
    }
}
