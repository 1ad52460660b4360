use crate::core::record_store::RecordStore;
use crate::domain::model::ResourceField;
use crate::utils::error::{AnalyticsError, Result};

/// Parses the buffer quantity typed by the user.
pub fn parse_buffer(text: &str) -> Result<i64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AnalyticsError::invalid_input("buffer storage value is required"));
    }

    let buffer: i64 = trimmed.parse().map_err(|_| {
        AnalyticsError::invalid_input(format!("buffer '{}' is not a whole number", trimmed))
    })?;

    if buffer < 0 {
        return Err(AnalyticsError::invalid_input(format!(
            "buffer {} must not be negative",
            buffer
        )));
    }

    Ok(buffer)
}

/// Subtracts `buffer` from every resource of `source` and adds it to
/// `destination`. No floor is applied, counts may go negative.
pub fn transfer(
    store: &mut RecordStore,
    source: usize,
    destination: usize,
    buffer: i64,
) -> Result<()> {
    if source == destination {
        return Err(AnalyticsError::index(format!(
            "source and destination are both row {}",
            source
        )));
    }
    store.check_index(source)?;
    store.check_index(destination)?;
    if buffer < 0 {
        return Err(AnalyticsError::invalid_input(format!(
            "buffer {} must not be negative",
            buffer
        )));
    }

    // 先算出全部新值，任一欄位溢位就不修改
    let mut updates = Vec::with_capacity(ResourceField::ALL.len());
    for field in ResourceField::ALL {
        let from = store.records()[source].get(field);
        let to = store.records()[destination].get(field);
        let from = from
            .checked_sub(buffer)
            .ok_or_else(|| AnalyticsError::overflow(&store.records()[source].name, field.label()))?;
        let to = to.checked_add(buffer).ok_or_else(|| {
            AnalyticsError::overflow(&store.records()[destination].name, field.label())
        })?;
        updates.push((field, from, to));
    }

    let records = store.records_mut();
    for (field, from, to) in updates {
        records[source].set(field, from);
        records[destination].set(field, to);
    }

    tracing::info!(
        "🚚 Transferred {} of each resource from '{}' (row {}) to '{}' (row {})",
        buffer,
        records[source].name,
        source,
        records[destination].name,
        destination
    );
    Ok(())
}

/// A validated manual transfer: two selected rows and a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRequest {
    pub source: usize,
    pub destination: usize,
    pub buffer: i64,
}

impl TransferRequest {
    /// The first selected row is the source, the second the destination.
    /// The selection is checked before the buffer text.
    pub fn from_selection(selected_rows: &[usize], buffer_text: &str) -> Result<Self> {
        let &[source, destination] = selected_rows else {
            return Err(AnalyticsError::index(format!(
                "select exactly two rows (source and destination), got {}",
                selected_rows.len()
            )));
        };
        if source == destination {
            return Err(AnalyticsError::index(format!(
                "source and destination are both row {}",
                source
            )));
        }

        Ok(Self {
            source,
            destination,
            buffer: parse_buffer(buffer_text)?,
        })
    }

    pub fn apply(&self, store: &mut RecordStore) -> Result<()> {
        transfer(store, self.source, self.destination, self.buffer)
    }
}
