use crate::adapters::render::{render_chart, render_chart_json, render_table};
use crate::app::commands::{Action, HELP};
use crate::core::chart::ChartDataBuilder;
use crate::core::filter::NameFilter;
use crate::core::rebalancer::ThresholdRebalancer;
use crate::core::record_store::{RecordStore, SharedStore};
use crate::core::transfer::TransferRequest;
use crate::utils::error::{AnalyticsError, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

const PROMPT: &str = "careconnect> ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Output(String),
    Quit,
}

/// Executes actions against a shared store. Each action holds the store lock
/// for its full duration.
pub struct Session {
    store: SharedStore,
    rebalancer: ThresholdRebalancer,
    chart: ChartDataBuilder,
    search_enabled: bool,
    filter: Option<NameFilter>,
}

impl Session {
    pub fn new(
        store: SharedStore,
        rebalancer: ThresholdRebalancer,
        chart: ChartDataBuilder,
        search_enabled: bool,
    ) -> Self {
        Self {
            store,
            rebalancer,
            chart,
            search_enabled,
            filter: None,
        }
    }

    pub fn store(&self) -> SharedStore {
        self.store.clone()
    }

    pub async fn execute(&mut self, action: Action) -> Result<Outcome> {
        let mut store = self.store.lock().await;

        let text = match action {
            Action::Show => {
                let visible = self.filter.as_ref().map(|filter| filter.apply(&store));
                render_table(&store, visible.as_ref())
            }
            Action::Search(query) => {
                if !self.search_enabled {
                    return Err(AnalyticsError::config(
                        "search is disabled for this variant (use --variant search)",
                    ));
                }
                let filter = NameFilter::new(&query);
                let visible = filter.apply(&store);
                tracing::debug!("Search '{}' matched {} rows", query, visible.len());

                let summary = format!("{} of {} hospitals match '{}'\n", visible.len(), store.len(), query);
                let table = render_table(&store, Some(&visible));
                self.filter = if query.is_empty() { None } else { Some(filter) };
                summary + &table
            }
            Action::Rebalance => {
                let report = self.rebalancer.rebalance(&mut store)?;
                tracing::info!("🔄 Manual rebalance made {} staff moves", report.len());
                format!(
                    "Rebalanced staff: {} moves\n{}",
                    report.len(),
                    self.chart_text(&store)
                )
            }
            Action::Transfer { selection, buffer } => {
                let request = TransferRequest::from_selection(&selection, &buffer)?;
                request.apply(&mut store)?;
                format!(
                    "Transferred {} of each resource from row {} to row {}\n{}",
                    request.buffer,
                    request.source,
                    request.destination,
                    self.chart_text(&store)
                )
            }
            Action::Set { row, field, value } => {
                store.set_text(row, field, &value)?;
                let record = store.get(row)?;
                format!("{} {} = {}", record.name, field.label(), record.get(field))
            }
            Action::Chart { json } => {
                let data = self.chart.build_staff_percentages(&store)?;
                if json {
                    render_chart_json(&data)?
                } else {
                    render_chart(&data)
                }
            }
            Action::Help => HELP.to_string(),
            Action::Quit => return Ok(Outcome::Quit),
        };

        Ok(Outcome::Output(text))
    }

    /// Chart refresh after a mutation; a chart error does not fail the action.
    fn chart_text(&self, store: &RecordStore) -> String {
        match self.chart.build_staff_percentages(store) {
            Ok(data) => render_chart(&data),
            Err(e) => {
                tracing::warn!("⚠️ Chart refresh failed: {}", e);
                format!("chart unavailable: {}\n", e.user_friendly_message())
            }
        }
    }

    /// Reads one action per line until EOF or `quit`. Errors are reported
    /// to the output and the session keeps going.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        while let Some(line) = lines.next_line().await? {
            if !line.trim().is_empty() {
                let outcome = match line.parse::<Action>() {
                    Ok(action) => self.execute(action).await,
                    Err(e) => Err(e),
                };

                match outcome {
                    Ok(Outcome::Quit) => break,
                    Ok(Outcome::Output(text)) => {
                        output.write_all(text.as_bytes()).await?;
                        if !text.ends_with('\n') {
                            output.write_all(b"\n").await?;
                        }
                    }
                    Err(e) => {
                        tracing::warn!("❌ {} (Category: {:?})", e, e.category());
                        let message = format!(
                            "error: {}\nhint: {}\n",
                            e.user_friendly_message(),
                            e.recovery_suggestion()
                        );
                        output.write_all(message.as_bytes()).await?;
                    }
                }
            }

            output.write_all(PROMPT.as_bytes()).await?;
            output.flush().await?;
        }

        output.flush().await?;
        Ok(())
    }
}
