use crate::cache::{RefreshStrategy, StoryCache};
use crate::hn_api::ItemSource;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use std::sync::Arc;

pub(crate) struct AppState<S> {
    pub(crate) cache: Arc<StoryCache<S>>,
    pub(crate) num_stories: usize,
    pub(crate) strategy: RefreshStrategy,
}

// Derived Clone would require `S: Clone`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            num_stories: self.num_stories,
            strategy: self.strategy,
        }
    }
}

pub(crate) fn app_router<S: ItemSource>(state: AppState<S>) -> axum::Router {
    axum::Router::new()
        .route("/", axum::routing::get(index::<S>))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

async fn index<S: ItemSource>(
    axum::extract::State(state): axum::extract::State<AppState<S>>,
) -> Response {
    let start = std::time::Instant::now();

    let stories = match state.strategy {
        RefreshStrategy::OnDemand => state.cache.get(state.num_stories).await,
        RefreshStrategy::Periodic => state.cache.latest(state.num_stories).await,
    };

    let stories = match stories {
        Ok(stories) => stories,
        Err(e) => {
            tracing::error!(error =? e, "Failed to load stories");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load stories").into_response();
        }
    };

    match crate::page::render_index(&stories, start.elapsed()) {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            tracing::error!(error =? e, "Failed to render page");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to process the template",
            )
                .into_response()
        }
    }
}

pub(crate) async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error =? e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
