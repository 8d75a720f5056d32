/// A story that made it onto the page. Same as [`crate::hn_api::RawItem`] with the
/// host of the link added.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DisplayItem {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) url: String,
    pub(crate) host: String,
    pub(crate) score: i64,
    pub(crate) by: String,
    pub(crate) time: i64,
    pub(crate) descendants: Option<i64>,
}

/// Only stories linking somewhere else qualify. Jobs, polls, comments and Ask HN
/// posts are dropped.
pub(crate) fn classify(item: crate::hn_api::RawItem) -> Option<DisplayItem> {
    if item.kind != "story" || item.url.is_empty() {
        return None;
    }

    let host = host_of(&item.url);
    Some(DisplayItem {
        id: item.id,
        title: item.title,
        url: item.url,
        host,
        score: item.score,
        by: item.by,
        time: item.time,
        descendants: item.descendants,
    })
}

/// Hostname without a leading `www.`, or empty if the url can't be parsed.
fn host_of(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(parsed) => {
            let host = parsed.host_str().unwrap_or_default();
            host.strip_prefix("www.").unwrap_or(host).to_string()
        }
        Err(_) => String::new(),
    }
}
