use serde::{Deserialize, Serialize};

/// Completion summary for a single observed day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStats {
    pub completed: u32,
    pub total: u32,
}

impl DayStats {
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed as f64 / self.total as f64) * 100.0).round() as u32
    }
}

/// Aggregate over an inclusive date range. Days never observed by the
/// ledger contribute nothing to `completed`/`total`; callers that want
/// full-capacity denominators derive them from `span_days`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeStats {
    pub completed: u32,
    pub total: u32,
    pub observed_days: u32,
    pub span_days: u32,
}

impl RangeStats {
    /// Five prayers for every day in the span, observed or not.
    pub fn capacity(&self) -> u32 {
        self.span_days * 5
    }

    pub fn percentage_of_capacity(&self) -> u32 {
        let capacity = self.capacity();
        if capacity == 0 {
            return 0;
        }
        ((self.completed as f64 / capacity as f64) * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_percentage_rounds() {
        let stats = DayStats { completed: 2, total: 5 };
        assert_eq!(stats.percentage(), 40);
        let stats = DayStats { completed: 1, total: 3 };
        assert_eq!(stats.percentage(), 33);
    }

    #[test]
    fn zero_total_does_not_divide() {
        let stats = DayStats { completed: 0, total: 0 };
        assert_eq!(stats.percentage(), 0);
    }

    #[test]
    fn capacity_counts_unobserved_days() {
        let stats = RangeStats {
            completed: 12,
            total: 15,
            observed_days: 3,
            span_days: 7,
        };
        assert_eq!(stats.capacity(), 35);
        assert_eq!(stats.percentage_of_capacity(), 34);
    }
}
