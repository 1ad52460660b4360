pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{CliConfig, Command};

pub use crate::adapters::storage::LocalStorage;
pub use crate::app::{Action, Outcome, Session};
pub use crate::config::TomlConfig;
pub use crate::core::{
    chart::ChartDataBuilder, engine::AnalyticsEngine, filter::NameFilter,
    rebalancer::ThresholdRebalancer, record_store::RecordStore, scheduler::RebalanceScheduler,
    transfer::TransferRequest,
};
pub use crate::domain::model::{HospitalRecord, ResourceField, StaffPercentage};
pub use crate::utils::error::{AnalyticsError, Result};
