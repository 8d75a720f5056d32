use crate::hn_api::ItemSource;
use crate::ranking::BuildError;
use crate::story::DisplayItem;

/// How the cached list is kept up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum RefreshStrategy {
    /// Rebuild inside the request that finds the list expired.
    OnDemand,
    /// Rebuild on a timer in the background, requests always get the last list.
    Periodic,
}

struct CacheEntry {
    stories: std::sync::Arc<[DisplayItem]>,
    deadline: tokio::time::Instant,
}

/// Holds the last built story list.
///
/// The entry lock only ever guards reading or swapping the entry. Rebuilds happen
/// outside of it and are serialized by `rebuild_lock`, so there is at most one build
/// in flight and readers of a fresh list never wait on the network.
///
/// `rebuild_lock` also keeps the error of the last finished build, and `builds`
/// counts finished builds. A caller that queued behind a build takes that build's
/// outcome instead of starting another one.
pub(crate) struct StoryCache<S> {
    source: std::sync::Arc<S>,
    expiration: std::time::Duration,
    item_timeout: std::time::Duration,

    entry: tokio::sync::Mutex<CacheEntry>,
    rebuild_lock: tokio::sync::Mutex<Option<BuildError>>,
    builds: std::sync::atomic::AtomicU64,
}

impl<S: ItemSource> StoryCache<S> {
    /// Starts out empty and already expired.
    pub(crate) fn new(
        source: std::sync::Arc<S>,
        expiration: std::time::Duration,
        item_timeout: std::time::Duration,
    ) -> Self {
        Self {
            source,
            expiration,
            item_timeout,
            entry: tokio::sync::Mutex::new(CacheEntry {
                stories: std::sync::Arc::from(Vec::new()),
                deadline: tokio::time::Instant::now(),
            }),
            rebuild_lock: tokio::sync::Mutex::new(None),
            builds: std::sync::atomic::AtomicU64::new(0),
        }
    }

    /// The `target` top stories. Served from the cache while fresh, otherwise rebuilt
    /// before returning.
    pub(crate) async fn get(
        &self,
        target: usize,
    ) -> Result<std::sync::Arc<[DisplayItem]>, BuildError> {
        // Read before the freshness check so a build finishing in between is noticed.
        let seen = self.builds.load(std::sync::atomic::Ordering::Acquire);

        if let Some(stories) = self.fresh(target).await {
            return Ok(stories);
        }

        let mut last_failure = self.rebuild_lock.lock().await;

        // Whoever held the lock before us may have just rebuilt it.
        if let Some(stories) = self.fresh(target).await {
            tracing::debug!("Story cache was rebuilt while waiting");
            return Ok(stories);
        }
        if self.builds.load(std::sync::atomic::Ordering::Acquire) != seen {
            if let Some(e) = last_failure.as_ref() {
                tracing::debug!(error =? e, "Story cache rebuild failed while waiting");
                return Err(e.clone());
            }
        }

        self.rebuild(target, &mut last_failure).await
    }

    /// The last list that was built, however old. Only builds one if there is none yet.
    pub(crate) async fn latest(
        &self,
        target: usize,
    ) -> Result<std::sync::Arc<[DisplayItem]>, BuildError> {
        {
            let entry = self.entry.lock().await;
            if entry.stories.len() == target {
                return Ok(std::sync::Arc::clone(&entry.stories));
            }
        }

        self.get(target).await
    }

    /// Rebuilds unconditionally. On failure the previous list stays in place.
    pub(crate) async fn refresh(&self, target: usize) {
        let mut last_failure = self.rebuild_lock.lock().await;

        if let Err(e) = self.rebuild(target, &mut last_failure).await {
            tracing::error!(error =? e, "Failed to refresh stories, keeping previous list");
        }
    }

    /// Refreshes every `interval`, starting right away. Never returns.
    ///
    /// `interval` must be non-zero, the command line rejects a zero cache timer.
    pub(crate) async fn run_periodic_refresh(
        self: std::sync::Arc<Self>,
        target: usize,
        interval: std::time::Duration,
    ) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.refresh(target).await;
        }
    }

    async fn fresh(&self, target: usize) -> Option<std::sync::Arc<[DisplayItem]>> {
        let entry = self.entry.lock().await;
        (tokio::time::Instant::now() < entry.deadline && entry.stories.len() == target)
            .then(|| std::sync::Arc::clone(&entry.stories))
    }

    /// `last_failure` is the guard of `rebuild_lock`.
    async fn rebuild(
        &self,
        target: usize,
        last_failure: &mut Option<BuildError>,
    ) -> Result<std::sync::Arc<[DisplayItem]>, BuildError> {
        let start = tokio::time::Instant::now();
        let built =
            crate::ranking::build_top_stories(&self.source, target, self.item_timeout).await;

        *last_failure = built.as_ref().err().cloned();
        self.builds.fetch_add(1, std::sync::atomic::Ordering::Release);

        let stories: std::sync::Arc<[DisplayItem]> = built?.into();
        *self.entry.lock().await = CacheEntry {
            stories: std::sync::Arc::clone(&stories),
            deadline: tokio::time::Instant::now() + self.expiration,
        };

        tracing::info!(
            num_stories = stories.len(),
            elapsed =? start.elapsed(),
            "Rebuilt story cache"
        );

        Ok(stories)
    }
}
