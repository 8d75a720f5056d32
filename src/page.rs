use askama::Template;

struct StoryRow<'a> {
    story: &'a crate::story::DisplayItem,
    age: String,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate<'a> {
    rows: Vec<StoryRow<'a>>,
    elapsed: String,
}

pub(crate) fn render_index(
    stories: &[crate::story::DisplayItem],
    elapsed: std::time::Duration,
) -> askama::Result<String> {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default();

    render_index_at(stories, elapsed, now)
}

fn render_index_at(
    stories: &[crate::story::DisplayItem],
    elapsed: std::time::Duration,
    now: i64,
) -> askama::Result<String> {
    IndexTemplate {
        rows: stories
            .iter()
            .map(|story| StoryRow {
                story,
                age: age(now - story.time),
            })
            .collect(),
        elapsed: format!("{elapsed:?}"),
    }
    .render()
}

/// "3 hours ago" style age of something posted `seconds` ago.
fn age(seconds: i64) -> String {
    let (amount, unit) = match seconds.max(0) {
        s if s < 60 => return "just now".to_string(),
        s if s < 60 * 60 => (s / 60, "minute"),
        s if s < 24 * 60 * 60 => (s / (60 * 60), "hour"),
        s => (s / (24 * 60 * 60), "day"),
    };

    if amount == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{amount} {unit}s ago")
    }
}
