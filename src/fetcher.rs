use crate::hn_api::ItemSource;
use crate::story::DisplayItem;

/// Outcome of a single fetch, tagged with the position of its id so the original
/// ranking can be restored once everything is in.
struct FetchResult {
    index: usize,
    story: Option<DisplayItem>,
}

/// Fetches all `ids` concurrently and returns the ones that qualify as stories, in the
/// same order as `ids`. Failed, timed out and non-story items are left out.
pub(crate) async fn fetch_stories<S: ItemSource>(
    source: &std::sync::Arc<S>,
    ids: &[i64],
    item_timeout: std::time::Duration,
) -> Vec<DisplayItem> {
    if ids.is_empty() {
        return Vec::new();
    }

    let mut fetch_set: tokio::task::JoinSet<FetchResult> = tokio::task::JoinSet::new();

    for (index, &id) in ids.iter().enumerate() {
        let source = std::sync::Arc::clone(source);
        fetch_set.spawn(async move {
            let story = match tokio::time::timeout(item_timeout, source.get_item(id)).await {
                Ok(Ok(item)) => {
                    let kind = item.kind.clone();
                    let story = crate::story::classify(item);
                    if story.is_none() {
                        tracing::debug!(id, kind = %kind, "Item is not a story link");
                    }
                    story
                }
                Ok(Err(e)) => {
                    tracing::debug!(id, error = %e, "Error getting item");
                    None
                }
                Err(_) => {
                    tracing::warn!(id, timeout =? item_timeout, "Timed out getting item");
                    None
                }
            };

            FetchResult { index, story }
        });
    }

    let mut results = Vec::with_capacity(ids.len());
    while let Some(res) = fetch_set.join_next().await {
        match res {
            Ok(result) => results.push(result),
            Err(e) => tracing::error!(error =? e, "Item fetch task failed"),
        }
    }

    results.sort_by_key(|r| r.index);
    results.into_iter().filter_map(|r| r.story).collect()
}
