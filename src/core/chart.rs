use crate::core::record_store::RecordStore;
use crate::domain::model::{HospitalRecord, StaffPercentage, ZeroTotalPolicy};
use crate::utils::error::{AnalyticsError, Result};

pub const CHART_TITLE: &str = "Resource Percentage in Hospitals";

/// Computes each hospital's staff share of its total resources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChartDataBuilder {
    zero_total: ZeroTotalPolicy,
}

impl ChartDataBuilder {
    pub fn new(zero_total: ZeroTotalPolicy) -> Self {
        Self { zero_total }
    }

    pub fn zero_total_policy(&self) -> ZeroTotalPolicy {
        self.zero_total
    }

    pub fn staff_percentage(&self, record: &HospitalRecord) -> Result<f64> {
        let total = record.total_resources();
        if total == 0 {
            return match self.zero_total {
                ZeroTotalPolicy::Fail => Err(AnalyticsError::DivisionError {
                    name: record.name.clone(),
                }),
                ZeroTotalPolicy::TreatAsZero => Ok(0.0),
            };
        }
        Ok(100.0 * record.staff as f64 / total as f64)
    }

    pub fn build_staff_percentages(&self, store: &RecordStore) -> Result<Vec<StaffPercentage>> {
        store
            .records()
            .iter()
            .map(|record| {
                Ok(StaffPercentage {
                    name: record.name.clone(),
                    percentage: self.staff_percentage(record)?,
                })
            })
            .collect()
    }
}
