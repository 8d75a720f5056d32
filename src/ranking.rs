use crate::hn_api::{ItemSource, SourceError};
use crate::story::DisplayItem;

#[derive(Debug, Clone, thiserror::Error)]
pub(crate) enum BuildError {
    #[error(transparent)]
    SourceUnavailable(#[from] SourceError),

    #[error("only {found} of {requested} requested stories are available")]
    InsufficientStories { requested: usize, found: usize },
}

/// Number of ids to request when `missing` stories are still needed. Part of the top
/// list is jobs, polls and text posts, so we ask for a quarter more than we need.
pub(crate) fn batch_size(missing: usize) -> usize {
    (missing * 5).div_ceil(4)
}

/// Builds the list of the `target` best ranked story links.
///
/// The top list is read once and then consumed in batches until enough stories are
/// found. Runs out of ids → [`BuildError::InsufficientStories`].
pub(crate) async fn build_top_stories<S: ItemSource>(
    source: &std::sync::Arc<S>,
    target: usize,
    item_timeout: std::time::Duration,
) -> Result<Vec<DisplayItem>, BuildError> {
    let ids = source.top_items().await?;

    let mut stories = Vec::with_capacity(target);
    let mut cursor = 0;

    while stories.len() < target {
        if cursor >= ids.len() {
            return Err(BuildError::InsufficientStories {
                requested: target,
                found: stories.len(),
            });
        }

        let end = (cursor + batch_size(target - stories.len())).min(ids.len());
        let found = crate::fetcher::fetch_stories(source, &ids[cursor..end], item_timeout).await;

        tracing::debug!(
            batch_start = cursor,
            batch_len = end - cursor,
            num_found = found.len(),
            "Fetched batch"
        );

        stories.extend(found);
        cursor = end;
    }

    stories.truncate(target);
    Ok(stories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeSource, job, story};
    use std::sync::Arc;
    use std::time::Duration;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn test_batch_size_over_fetches_by_a_quarter() {
        assert_eq!(batch_size(30), 38);
        assert_eq!(batch_size(10), 13);
        assert_eq!(batch_size(4), 5);
        assert_eq!(batch_size(1), 2);
        assert_eq!(batch_size(0), 0);
    }

    #[tokio::test]
    async fn test_every_fourth_item_a_story() {
        let source = Arc::new(FakeSource::new((1..=100).collect(), |id| {
            Some(if id % 4 == 0 { story(id) } else { job(id) })
        }));

        let stories = build_top_stories(&source, 10, TIMEOUT).await.unwrap();

        let ids: Vec<i64> = stories.iter().map(|s| s.id).collect();
        assert_eq!(ids, (1..=10).map(|i| i * 4).collect::<Vec<_>>());
        assert_eq!(source.top_items_calls(), 1);
        // Batches of 13, 9, 7, 4, 3, 2 and 2 ids.
        assert_eq!(source.get_item_calls(), 40);
    }

    #[tokio::test]
    async fn test_result_is_truncated_to_target() {
        let source = Arc::new(FakeSource::new((1..=50).collect(), |id| Some(story(id))));

        let stories = build_top_stories(&source, 10, TIMEOUT).await.unwrap();

        assert_eq!(stories.len(), 10);
        assert_eq!(stories[9].id, 10);
        assert_eq!(source.get_item_calls(), 13);
    }

    #[tokio::test]
    async fn test_insufficient_stories() {
        let source = Arc::new(FakeSource::new((1..=15).collect(), |id| {
            Some(if id % 5 == 0 { story(id) } else { job(id) })
        }));

        let err = build_top_stories(&source, 10, TIMEOUT).await.unwrap_err();

        assert!(matches!(
            err,
            BuildError::InsufficientStories {
                requested: 10,
                found: 3
            }
        ));
        assert_eq!(source.get_item_calls(), 15);
    }

    #[tokio::test]
    async fn test_source_unavailable() {
        let source = Arc::new(FakeSource::new((1..=15).collect(), |id| Some(story(id))));
        source.set_fail_top_items(true);

        let err = build_top_stories(&source, 10, TIMEOUT).await.unwrap_err();

        assert!(matches!(err, BuildError::SourceUnavailable(_)));
        assert_eq!(source.get_item_calls(), 0);
    }

    #[tokio::test]
    async fn test_zero_target_fetches_no_items() {
        let source = Arc::new(FakeSource::new((1..=15).collect(), |id| Some(story(id))));

        let stories = build_top_stories(&source, 0, TIMEOUT).await.unwrap();

        assert!(stories.is_empty());
        assert_eq!(source.get_item_calls(), 0);
    }
}
