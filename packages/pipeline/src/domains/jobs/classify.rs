//! Classification step: enrich new postings with structured attributes
//! before they are persisted.

use reconcile::Record;
use tracing::warn;

use crate::kernel::BaseClassifier;

/// Attach classifier output to each record under `attributes`.
///
/// Classification failures do not drop records: a posting we cannot
/// classify is still worth persisting, so it passes through unenriched
/// with a warning.
pub async fn classify_new_records(
    records: Vec<Record>,
    classifier: &dyn BaseClassifier,
) -> Vec<Record> {
    let mut enriched = Vec::with_capacity(records.len());

    for record in records {
        match classifier.classify(&record).await {
            Ok(attributes) => match serde_json::to_value(&attributes) {
                Ok(value) => enriched.push(record.with_field("attributes", value)),
                Err(err) => {
                    warn!(error = %err, "failed to serialize attributes; persisting unclassified");
                    enriched.push(record);
                }
            },
            Err(err) => {
                warn!(error = %err, "classification failed; persisting unclassified");
                enriched.push(record);
            }
        }
    }

    enriched
}
