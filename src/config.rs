#[derive(Debug)]
pub(crate) struct Config {
    pub(crate) hn_api_base_url: String,
    pub(crate) item_fetch_timeout: std::time::Duration,

    pub(crate) log_directory: String,
    pub(crate) log_to_console: bool,
}

static CONFIG: std::sync::LazyLock<Config> = std::sync::LazyLock::new(|| {
    // A missing .env is fine, everything has a default.
    let _ = dotenvy::dotenv();

    Config {
        hn_api_base_url: env_or(
            "HN_API_BASE_URL",
            "https://hacker-news.firebaseio.com/v0".to_string(),
        ),
        item_fetch_timeout: std::time::Duration::from_millis(env_or(
            "ITEM_FETCH_TIMEOUT_MS",
            3000,
        )),
        log_directory: env_or("LOG_DIRECTORY", "./log".to_string()),
        log_to_console: env_or("LOG_TO_CONSOLE", false),
    }
});

pub(crate) fn config() -> &'static Config {
    &CONFIG
}

fn env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Debug,
{
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .unwrap_or_else(|e| panic!("{key} could not be parsed: {e:?}")),
        Err(_) => default,
    }
}
