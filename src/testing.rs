//! In-memory item source for tests.

use crate::hn_api::{ItemSource, RawItem, SourceError};

#[derive(Default)]
pub(crate) struct FakeSource {
    top: std::sync::Mutex<Vec<i64>>,
    items: std::collections::HashMap<i64, RawItem>,
    delays: std::collections::HashMap<i64, std::time::Duration>,
    top_items_delay: std::time::Duration,

    fail_top_items: std::sync::atomic::AtomicBool,
    top_items_calls: std::sync::atomic::AtomicUsize,
    get_item_calls: std::sync::atomic::AtomicUsize,
}

pub(crate) fn story(id: i64) -> RawItem {
    RawItem {
        id,
        kind: "story".to_string(),
        url: format!("https://www.example.com/{id}"),
        title: format!("Story {id}"),
        score: 100 - id,
        by: "tester".to_string(),
        time: 1_700_000_000,
        descendants: Some(0),
    }
}

pub(crate) fn job(id: i64) -> RawItem {
    RawItem {
        kind: "job".to_string(),
        ..story(id)
    }
}

impl FakeSource {
    /// Every id in `top` gets an item from `make`. Ids `make` returns `None` for fail to
    /// fetch.
    pub(crate) fn new(top: Vec<i64>, make: impl Fn(i64) -> Option<RawItem>) -> Self {
        let items = top.iter().filter_map(|&id| make(id)).map(|i| (i.id, i)).collect();
        Self {
            top: std::sync::Mutex::new(top),
            items,
            ..Default::default()
        }
    }

    pub(crate) fn with_delay(mut self, id: i64, delay: std::time::Duration) -> Self {
        self.delays.insert(id, delay);
        self
    }

    pub(crate) fn with_top_items_delay(mut self, delay: std::time::Duration) -> Self {
        self.top_items_delay = delay;
        self
    }

    pub(crate) fn set_fail_top_items(&self, fail: bool) {
        self.fail_top_items.store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    pub(crate) fn set_top(&self, top: Vec<i64>) {
        *self.top.lock().unwrap() = top;
    }

    pub(crate) fn top_items_calls(&self) -> usize {
        self.top_items_calls.load(std::sync::atomic::Ordering::SeqCst)
    }

    pub(crate) fn get_item_calls(&self) -> usize {
        self.get_item_calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ItemSource for FakeSource {
    async fn top_items(&self) -> Result<Vec<i64>, SourceError> {
        self.top_items_calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        tokio::time::sleep(self.top_items_delay).await;

        if self.fail_top_items.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(SourceError::SourceUnavailable("switched off".to_string()));
        }
        Ok(self.top.lock().unwrap().clone())
    }

    async fn get_item(&self, id: i64) -> Result<RawItem, SourceError> {
        self.get_item_calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if let Some(delay) = self.delays.get(&id) {
            tokio::time::sleep(*delay).await;
        }

        self.items
            .get(&id)
            .cloned()
            .ok_or_else(|| SourceError::ItemUnavailable {
                id,
                reason: "not found".to_string(),
            })
    }
}
