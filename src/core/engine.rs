use crate::core::chart::ChartDataBuilder;
use crate::core::rebalancer::ThresholdRebalancer;
use crate::core::record_store::{RecordStore, SharedStore};
use crate::core::scheduler::RebalanceScheduler;
use crate::core::{ChartSink, ConfigProvider, Storage};
use crate::utils::error::Result;
use std::sync::Arc;
use std::time::Duration;

/// Wires storage and configuration into a loaded store and the components
/// that operate on it.
pub struct AnalyticsEngine<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> AnalyticsEngine<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub async fn load_store(&self) -> Result<RecordStore> {
        let path = self.config.data_path();
        tracing::info!("📁 Loading hospital data from {}", path);

        let bytes = self.storage.read_file(path).await?;
        let store = RecordStore::from_csv_bytes(&bytes, self.config.load_policy())?;

        tracing::info!("✅ Loaded {} hospital records", store.len());
        Ok(store)
    }

    pub fn rebalancer(&self) -> ThresholdRebalancer {
        ThresholdRebalancer::new(self.config.threshold())
    }

    pub fn chart_builder(&self) -> ChartDataBuilder {
        ChartDataBuilder::new(self.config.zero_total_policy())
    }

    pub fn scheduler(&self, store: SharedStore) -> RebalanceScheduler {
        RebalanceScheduler::new(
            store,
            self.rebalancer(),
            Duration::from_millis(self.config.interval_ms()),
        )
    }

    /// Scheduler that refreshes `sink` after every timed rebalance.
    pub fn charting_scheduler(
        &self,
        store: SharedStore,
        sink: Arc<dyn ChartSink>,
    ) -> RebalanceScheduler {
        self.scheduler(store).with_chart_sink(sink, self.chart_builder())
    }
}
