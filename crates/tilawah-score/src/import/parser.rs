use crate::scoring::GroupedObservation;
use serde::Deserialize;
use std::io::Read;

pub(crate) fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// One exported row; extra columns such as `assessor_id` are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct ObservationRow {
    participant_id: String,
    item_label: String,
    #[serde(alias = "raw_category")]
    category: String,
    error_severity: f64,
    /// Present on grouped exports; empty or missing means a single observation.
    #[serde(default)]
    occurrences: Option<u64>,
}

impl From<ObservationRow> for GroupedObservation {
    fn from(row: ObservationRow) -> Self {
        GroupedObservation {
            participant_id: row.participant_id,
            item_label: row.item_label,
            raw_category: row.category,
            error_severity: row.error_severity,
            occurrences: row.occurrences.unwrap_or(1),
        }
    }
}
