//! HTTP host — the webhook endpoint the channel posts activities to.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use crate::activity::Activity;
use crate::bot::{ActivitySink, TurnContext, TurnRouter};

/// Shared state for the webhook route.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<TurnRouter>,
    pub sink: Arc<dyn ActivitySink>,
}

/// POST /api/messages
///
/// One inbound activity per request. The turn runs to completion before the
/// response goes out; 202 acknowledges receipt on both the success path and
/// the recovered-error path. Envelopes that do not parse are rejected by the
/// JSON extractor before a turn starts.
async fn post_activity(
    State(state): State<AppState>,
    Json(activity): Json<Activity>,
) -> StatusCode {
    let ctx = TurnContext::new(activity, Arc::clone(&state.sink));
    if let Err(err) = state.router.handle_turn(&ctx).await {
        state.router.on_turn_error(&ctx, &err).await;
    }
    StatusCode::ACCEPTED
}

/// Build the webhook routes.
pub fn message_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/messages", post(post_activity))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
