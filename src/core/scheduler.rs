use crate::core::chart::ChartDataBuilder;
use crate::core::rebalancer::{RebalanceReport, ThresholdRebalancer};
use crate::core::record_store::SharedStore;
use crate::domain::ports::ChartSink;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

#[derive(Debug, Clone)]
pub struct TickReport {
    pub tick: u64,
    pub at: DateTime<Utc>,
    pub rebalance: RebalanceReport,
}

/// Periodically rebalances a shared store.
///
/// Each tick holds the store lock for the whole rebalance pass, so manual
/// actions never observe a half-applied pass. The chart sink is refreshed
/// after the lock is released.
pub struct RebalanceScheduler {
    store: SharedStore,
    rebalancer: ThresholdRebalancer,
    chart: ChartDataBuilder,
    period: Duration,
    sink: Option<Arc<dyn ChartSink>>,
    ticks: u64,
}

impl RebalanceScheduler {
    pub fn new(store: SharedStore, rebalancer: ThresholdRebalancer, period: Duration) -> Self {
        Self {
            store,
            rebalancer,
            chart: ChartDataBuilder::default(),
            // tokio 的 interval 不接受零
            period: period.max(Duration::from_millis(1)),
            sink: None,
            ticks: 0,
        }
    }

    pub fn with_chart_sink(mut self, sink: Arc<dyn ChartSink>, chart: ChartDataBuilder) -> Self {
        self.sink = Some(sink);
        self.chart = chart;
        self
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub async fn tick(&mut self) -> Result<TickReport> {
        let (rebalance, chart_data) = {
            let mut store = self.store.lock().await;
            let rebalance = self.rebalancer.rebalance(&mut store)?;
            let chart_data = self
                .sink
                .as_ref()
                .map(|_| self.chart.build_staff_percentages(&store));
            (rebalance, chart_data)
        };

        self.ticks += 1;
        let report = TickReport {
            tick: self.ticks,
            at: Utc::now(),
            rebalance,
        };

        if let (Some(sink), Some(data)) = (&self.sink, chart_data) {
            sink.refresh(&data?).await?;
        }

        Ok(report)
    }

    /// Runs until `max_ticks` ticks have fired, or forever when `None`.
    /// The first tick fires one full period after the call.
    pub async fn run(&mut self, max_ticks: Option<u64>) -> u64 {
        let mut interval = interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            "⏱️ Rebalancing staff every {:?} (threshold {})",
            self.period,
            self.rebalancer.threshold()
        );

        let mut fired = 0u64;
        while max_ticks.map_or(true, |max| fired < max) {
            interval.tick().await;
            fired += 1;

            match self.tick().await {
                Ok(report) if report.rebalance.is_empty() => {
                    tracing::debug!("Tick {}: all hospitals at or above threshold", report.tick);
                }
                Ok(report) => {
                    tracing::info!(
                        "Tick {} at {}: {} staff moves",
                        report.tick,
                        report.at.format("%H:%M:%S"),
                        report.rebalance.len()
                    );
                }
                Err(e) => {
                    tracing::warn!("⚠️ Rebalance tick failed: {}", e);
                }
            }
        }

        fired
    }
}
