const MAX_INTERVAL_BETWEEN_TRIES: std::time::Duration = std::time::Duration::from_secs(5);

/// Used for the top story listing. Single items are not retried, they are simply
/// left out of the page.
pub(crate) fn backoff_default() -> backoff::ExponentialBackoff {
    backoff::ExponentialBackoffBuilder::new()
        .with_max_interval(MAX_INTERVAL_BETWEEN_TRIES)
        .with_max_elapsed_time(Some(std::time::Duration::from_secs(30)))
        .build()
}
