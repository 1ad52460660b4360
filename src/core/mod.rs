pub mod chart;
pub mod engine;
pub mod filter;
pub mod rebalancer;
pub mod record_store;
pub mod scheduler;
pub mod transfer;

pub use crate::domain::model::{HospitalRecord, ResourceField, StaffPercentage};
pub use crate::domain::ports::{ChartSink, ConfigProvider, Storage};
pub use crate::utils::error::Result;
