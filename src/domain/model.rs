use crate::utils::error::AnalyticsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minimum staff count below which automatic rebalancing kicks in.
pub const DEFAULT_STAFF_THRESHOLD: i64 = 10;

pub const NAME_LABEL: &str = "Hospital Name";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HospitalRecord {
    pub name: String,
    pub staff: i64,
    pub doctors: i64,
    pub beds: i64,
    pub ct_scanners: i64,
    pub mri_machines: i64,
}

impl HospitalRecord {
    pub fn new(
        name: impl Into<String>,
        staff: i64,
        doctors: i64,
        beds: i64,
        ct_scanners: i64,
        mri_machines: i64,
    ) -> Self {
        Self {
            name: name.into(),
            staff,
            doctors,
            beds,
            ct_scanners,
            mri_machines,
        }
    }

    pub fn get(&self, field: ResourceField) -> i64 {
        match field {
            ResourceField::Staff => self.staff,
            ResourceField::Doctors => self.doctors,
            ResourceField::Beds => self.beds,
            ResourceField::CtScanners => self.ct_scanners,
            ResourceField::MriMachines => self.mri_machines,
        }
    }

    pub fn field_mut(&mut self, field: ResourceField) -> &mut i64 {
        match field {
            ResourceField::Staff => &mut self.staff,
            ResourceField::Doctors => &mut self.doctors,
            ResourceField::Beds => &mut self.beds,
            ResourceField::CtScanners => &mut self.ct_scanners,
            ResourceField::MriMachines => &mut self.mri_machines,
        }
    }

    pub fn set(&mut self, field: ResourceField, value: i64) {
        *self.field_mut(field) = value;
    }

    /// Sum of all five counts, widened so large counts cannot overflow.
    pub fn total_resources(&self) -> i128 {
        ResourceField::ALL
            .iter()
            .map(|field| i128::from(self.get(*field)))
            .sum()
    }
}

/// The five numeric columns, in CSV column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceField {
    Staff,
    Doctors,
    Beds,
    CtScanners,
    MriMachines,
}

impl ResourceField {
    pub const ALL: [ResourceField; 5] = [
        ResourceField::Staff,
        ResourceField::Doctors,
        ResourceField::Beds,
        ResourceField::CtScanners,
        ResourceField::MriMachines,
    ];

    /// Zero-based CSV column; column 0 holds the name.
    pub fn column(self) -> usize {
        match self {
            ResourceField::Staff => 1,
            ResourceField::Doctors => 2,
            ResourceField::Beds => 3,
            ResourceField::CtScanners => 4,
            ResourceField::MriMachines => 5,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            ResourceField::Staff => "staff",
            ResourceField::Doctors => "doctors",
            ResourceField::Beds => "beds",
            ResourceField::CtScanners => "ct_scanners",
            ResourceField::MriMachines => "mri_machines",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResourceField::Staff => "Number of Staff",
            ResourceField::Doctors => "Number of Doctors",
            ResourceField::Beds => "Number of Beds",
            ResourceField::CtScanners => "Number of CT Scanners",
            ResourceField::MriMachines => "Number of MRI Machines",
        }
    }
}

impl fmt::Display for ResourceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ResourceField {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "staff" => Ok(ResourceField::Staff),
            "doctors" => Ok(ResourceField::Doctors),
            "beds" => Ok(ResourceField::Beds),
            "ct_scanners" | "ct" => Ok(ResourceField::CtScanners),
            "mri_machines" | "mri" => Ok(ResourceField::MriMachines),
            _ => Err(AnalyticsError::invalid_input(format!(
                "unknown resource '{}', expected one of: staff, doctors, beds, ct_scanners, mri_machines",
                s
            ))),
        }
    }
}

/// One bar of the staff share chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffPercentage {
    pub name: String,
    pub percentage: f64,
}

/// What to do with a data row whose numeric cells do not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    #[default]
    FailFast,
    SkipInvalid,
}

/// What to do with a hospital whose five resource counts add up to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroTotalPolicy {
    #[default]
    Fail,
    TreatAsZero,
}

/// Feature presets. `Classic` rebalances every five minutes without search,
/// `Search` rebalances every three seconds and enables the name filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum AppVariant {
    Classic,
    #[default]
    Search,
}

impl AppVariant {
    pub fn default_interval_ms(self) -> u64 {
        match self {
            AppVariant::Classic => 300_000,
            AppVariant::Search => 3_000,
        }
    }

    pub fn search_enabled(self) -> bool {
        matches!(self, AppVariant::Search)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_resources_sums_all_fields() {
        let record = HospitalRecord::new("C", 10, 10, 10, 10, 10);
        assert_eq!(record.total_resources(), 50);
    }

    #[test]
    fn test_total_resources_does_not_wrap() {
        let record = HospitalRecord::new("Big", i64::MAX, i64::MAX, 1, 0, 0);
        assert_eq!(record.total_resources(), 2 * i128::from(i64::MAX) + 1);
    }

    #[test]
    fn test_field_columns_follow_csv_order() {
        let columns: Vec<usize> = ResourceField::ALL.iter().map(|f| f.column()).collect();
        assert_eq!(columns, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_resource_field_from_str() {
        assert_eq!("Staff".parse::<ResourceField>().unwrap(), ResourceField::Staff);
        assert_eq!("ct-scanners".parse::<ResourceField>().unwrap(), ResourceField::CtScanners);
        assert_eq!("mri".parse::<ResourceField>().unwrap(), ResourceField::MriMachines);
        assert!("nurses".parse::<ResourceField>().is_err());
    }

    #[test]
    fn test_variant_presets() {
        assert_eq!(AppVariant::Classic.default_interval_ms(), 300_000);
        assert!(!AppVariant::Classic.search_enabled());
        assert_eq!(AppVariant::Search.default_interval_ms(), 3_000);
        assert!(AppVariant::Search.search_enabled());
    }
}
