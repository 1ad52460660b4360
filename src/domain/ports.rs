use crate::domain::model::{LoadPolicy, StaffPercentage, ZeroTotalPolicy};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn data_path(&self) -> &str;
    fn threshold(&self) -> i64;
    fn interval_ms(&self) -> u64;
    fn search_enabled(&self) -> bool;
    fn load_policy(&self) -> LoadPolicy;
    fn zero_total_policy(&self) -> ZeroTotalPolicy;
}

/// Receives fresh chart data after every mutation of the store.
#[async_trait]
pub trait ChartSink: Send + Sync {
    async fn refresh(&self, data: &[StaffPercentage]) -> Result<()>;
}
