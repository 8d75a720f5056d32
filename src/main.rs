use tracing_subscriber::util::SubscriberInitExt;

mod backoff;
pub(crate) mod cache;
pub(crate) mod config;
pub(crate) mod fetcher;
pub(crate) mod hn_api;
pub(crate) mod page;
pub(crate) mod ranking;
pub(crate) mod server;
pub(crate) mod story;
#[cfg(test)]
mod testing;

pub(crate) static CLIENT: std::sync::LazyLock<reqwest::Client> =
    std::sync::LazyLock::new(reqwest::Client::new);

#[derive(Debug, Clone, clap::Parser)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 3000)]
    #[arg(help = "The port to start the web server on")]
    port: u16,

    #[arg(short, long, default_value_t = 30)]
    #[arg(help = "The number of top stories to display")]
    num_stories: usize,

    #[arg(short, long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    #[arg(help = "Seconds before the cached stories are refreshed")]
    cache_timer: u64,

    #[arg(short, long, value_enum, default_value_t = cache::RefreshStrategy::OnDemand)]
    #[arg(help = "Rebuild stale stories inside the request or on a background timer")]
    refresh: cache::RefreshStrategy,

    #[arg(short, long, default_value = "false")]
    #[arg(help = "Log to console")]
    log_to_console: bool,
}

async fn serve(args: Args) -> anyhow::Result<()> {
    let cache_timer = std::time::Duration::from_secs(args.cache_timer);
    let source = std::sync::Arc::new(hn_api::HackerNewsClient::new(
        config::config().hn_api_base_url.clone(),
    ));
    let cache = std::sync::Arc::new(cache::StoryCache::new(
        source,
        cache_timer,
        config::config().item_fetch_timeout,
    ));

    let refresher = match args.refresh {
        cache::RefreshStrategy::Periodic => Some(tokio::spawn(
            std::sync::Arc::clone(&cache).run_periodic_refresh(args.num_stories, cache_timer),
        )),
        cache::RefreshStrategy::OnDemand => None,
    };

    let app = server::app_router(server::AppState {
        cache,
        num_stories: args.num_stories,
        strategy: args.refresh,
    });

    let address = std::net::SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(address).await?;
    tracing::info!(address = %address, "Listening");

    let res = axum::serve(listener, app)
        .with_graceful_shutdown(server::shutdown_signal())
        .await;

    if let Some(refresher) = refresher {
        refresher.abort();
    }

    Ok(res?)
}

#[tokio::main]
async fn main() {
    use tracing_subscriber::layer::Layer;
    use tracing_subscriber::layer::SubscriberExt;

    use clap::Parser;
    let args = Args::parse();

    let file_appender =
        tracing_appender::rolling::daily(&config::config().log_directory, "quiet_hn.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer();
    let file_layer = file_layer
        .with_writer(non_blocking)
        .json()
        .with_filter(tracing::level_filters::LevelFilter::INFO)
        .boxed();

    let pretty_layer = tracing_subscriber::fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stdout)
        .with_filter(tracing::level_filters::LevelFilter::INFO)
        .boxed();

    let registry = tracing_subscriber::registry().with(file_layer);

    if config::config().log_to_console || args.log_to_console {
        registry.with(pretty_layer).init();
    } else {
        registry.init();
    };

    tracing::info!(
        config =? config::config(),
        args =? args,
        "Starting Quiet Hacker News"
    );

    match serve(args).await {
        Ok(_) => tracing::info!("Quiet Hacker News stopped"),
        Err(e) => {
            tracing::error!(error =? e, "Error when serving");
            std::process::exit(1);
        }
    }
}
