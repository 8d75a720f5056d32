/// Errors coming back from the item source. Callers decide what is fatal: a failed
/// listing fails the page, a failed item is just left out.
#[derive(Debug, Clone, thiserror::Error)]
pub(crate) enum SourceError {
    #[error("top stories could not be retrieved: {0}")]
    SourceUnavailable(String),

    #[error("item {id} could not be retrieved: {reason}")]
    ItemUnavailable { id: i64, reason: String },
}

/// An item exactly as the Hacker News API returns it.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub(crate) struct RawItem {
    pub(crate) id: i64,

    #[serde(rename = "type")]
    pub(crate) kind: String,

    #[serde(default)]
    pub(crate) url: String,
    #[serde(default)]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) score: i64,

    #[serde(default)]
    pub(crate) by: String,
    /// Unix seconds.
    #[serde(default)]
    pub(crate) time: i64,
    pub(crate) descendants: Option<i64>,
}

#[async_trait::async_trait]
pub(crate) trait ItemSource: Send + Sync + 'static {
    /// Ids of the current top items, best ranked first.
    async fn top_items(&self) -> Result<Vec<i64>, SourceError>;

    async fn get_item(&self, id: i64) -> Result<RawItem, SourceError>;
}

pub(crate) struct HackerNewsClient {
    base_url: String,
}

impl HackerNewsClient {
    pub(crate) fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_top_items(&self) -> anyhow::Result<Vec<i64>> {
        let response = crate::CLIENT
            .get(format!("{}/topstories.json", self.base_url))
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<Vec<i64>>().await?)
    }

    async fn fetch_item(&self, id: i64) -> anyhow::Result<RawItem> {
        let response = crate::CLIENT
            .get(format!("{}/item/{}.json", self.base_url, id))
            .send()
            .await?
            .error_for_status()?;

        // Deleted and unknown items come back as a literal `null`.
        response
            .json::<Option<RawItem>>()
            .await?
            .ok_or_else(|| anyhow::anyhow!("item does not exist"))
    }
}

#[async_trait::async_trait]
impl ItemSource for HackerNewsClient {
    async fn top_items(&self) -> Result<Vec<i64>, SourceError> {
        ::backoff::future::retry(crate::backoff::backoff_default(), || async move {
            self.fetch_top_items().await.map_err(|e| {
                tracing::warn!(error =? e, "Failed to get top stories, retrying");
                ::backoff::Error::transient(e)
            })
        })
        .await
        .map_err(|e| SourceError::SourceUnavailable(e.to_string()))
    }

    async fn get_item(&self, id: i64) -> Result<RawItem, SourceError> {
        self.fetch_item(id)
            .await
            .map_err(|e| SourceError::ItemUnavailable {
                id,
                reason: e.to_string(),
            })
    }
}
