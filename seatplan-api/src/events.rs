use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Router,
};
use futures_util::{Stream, StreamExt};
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use tracing::warn;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/events", get(stream_events))
}

/// Server-sent stream of layout change events. Each SSE event is named by
/// the change kind and carries the event as JSON.
async fn stream_events(State(state): State<AppState>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.session.lock().await.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(event) => Event::default().event(event.kind()).json_data(&event).ok().map(Ok),
            Err(e) => {
                // Lagged receivers skip ahead rather than closing the stream.
                warn!("Event subscriber fell behind: {}", e);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
