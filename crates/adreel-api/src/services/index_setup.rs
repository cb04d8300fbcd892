//! First-time index setup used by the `create-index` binary.

use tracing::{info, warn};

use adreel_twelvelabs::{CreateIndexRequest, IndexSummary, TwelveLabsClient, TwelveLabsResult};

/// Reuse the first index visible to the key, or create one.
///
/// A failed listing is logged and treated as "no index yet".
pub async fn find_or_create_index(
    client: &TwelveLabsClient,
    name: Option<String>,
    force_new: bool,
) -> TwelveLabsResult<IndexSummary> {
    if !force_new {
        match client.list_indexes().await {
            Ok(indexes) => {
                if let Some(index) = indexes.into_iter().next() {
                    info!(
                        index_id = %index.id,
                        name = index.index_name.as_deref().unwrap_or("(unnamed)"),
                        "Reusing existing index"
                    );
                    return Ok(index);
                }
            }
            Err(e) => warn!(error = %e, "Could not list indexes; creating a new one"),
        }
    }

    let mut request = CreateIndexRequest::default();
    if let Some(name) = name {
        request.index_name = name;
    }
    info!(name = %request.index_name, "Creating index");
    client.create_index(&request).await
}
