use crate::core::record_store::RecordStore;
use crate::domain::model::{ResourceField, DEFAULT_STAFF_THRESHOLD};
use crate::utils::error::{AnalyticsError, Result};

/// A single staff move made during a rebalance pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaffMove {
    pub recipient: usize,
    pub donor: usize,
    pub amount: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebalanceReport {
    pub moves: Vec<StaffMove>,
}

impl RebalanceReport {
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Tops up understaffed hospitals from another row.
///
/// One left-to-right pass; each row below the threshold takes
/// `donor.staff - threshold` from the first other row and the donor is left
/// with exactly that amount. A recipient may still sit below the threshold
/// after its move, and later rows see the already mutated counts, so two
/// consecutive passes can disagree. Counts that would leave the `i64` range
/// fail the pass with `OverflowError`; moves made before that point stay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdRebalancer {
    threshold: i64,
}

impl Default for ThresholdRebalancer {
    fn default() -> Self {
        Self::new(DEFAULT_STAFF_THRESHOLD)
    }
}

impl ThresholdRebalancer {
    pub fn new(threshold: i64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> i64 {
        self.threshold
    }

    pub fn rebalance(&self, store: &mut RecordStore) -> Result<RebalanceReport> {
        let mut report = RebalanceReport::default();
        let records = store.records_mut();

        for row in 0..records.len() {
            let staff = records[row].staff;
            if staff >= self.threshold {
                continue;
            }

            let Some(donor) = (0..records.len()).find(|&other| other != row) else {
                tracing::debug!("Row {} is understaffed but has no donor", row);
                continue;
            };

            let overflow =
                |at: usize| AnalyticsError::overflow(&records[at].name, ResourceField::Staff.label());
            let delta = records[donor]
                .staff
                .checked_sub(self.threshold)
                .ok_or_else(|| overflow(donor))?;
            let topped_up = staff.checked_add(delta).ok_or_else(|| overflow(row))?;
            records[donor].staff = delta;
            records[row].staff = topped_up;

            tracing::debug!(
                "🔄 Moved {} staff from '{}' (row {}) to '{}' (row {})",
                delta,
                records[donor].name,
                donor,
                records[row].name,
                row
            );
            report.moves.push(StaffMove {
                recipient: row,
                donor,
                amount: delta,
            });
        }

        Ok(report)
    }
}
