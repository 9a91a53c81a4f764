//! Joins raw vector-search hits back to their canonical records.

use crate::database::RecordStore;
use crate::error::Result;
use crate::models::SearchResult;
use crate::vector_index::VectorHit;

/// Look up every hit in the record store, in order.
///
/// Hits whose record no longer exists are dropped. Errors from the record
/// store propagate and abort the whole call.
pub async fn hydrate_results(
    records: &dyn RecordStore,
    hits: Vec<VectorHit>,
) -> Result<Vec<SearchResult>> {
    let mut results = Vec::with_capacity(hits.len());

    for hit in hits {
        match records.fetch(&hit.id).await? {
            Some(document) => {
                results.push(SearchResult::from_document(document, hit.score, hit.distance));
            }
            None => {
                tracing::debug!(doc_id = %hit.id, "Dropping search hit without a stored record");
            }
        }
    }

    Ok(results)
}
