//! Server-Sent Events (SSE) stream of status snapshots.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use crate::state::DashboardState;

/// `GET /api/status/stream`: every status snapshot the automation reports,
/// JSON-encoded in SSE `data:` frames.
///
/// The stream continues until the client disconnects or the dashboard is
/// dropped. Slow clients skip the snapshots they missed.
pub async fn stream(
    State(state): State<DashboardState>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>> {
    let status_rx = state.subscribe();
    let status_stream = BroadcastStream::new(status_rx).filter_map(|result| match result {
        Ok(status) => match serde_json::to_string(&status) {
            Ok(json) => Some(Ok(Event::default().event("status").data(json))),
            Err(err) => {
                tracing::warn!(%err, "failed to serialize status for SSE stream");
                None
            }
        },
        Err(BroadcastStreamRecvError::Lagged(n)) => {
            tracing::warn!(skipped = n, "SSE subscriber lagged, some snapshots were dropped");
            None
        }
    });

    Sse::new(status_stream).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use axum::response::IntoResponse;
    use http_body_util::BodyExt;
    use serde_json::{Map, Value, json};

    use pironman_domain::config::ConfigDocument;
    use pironman_domain::status::Status;
    use pironman_domain::variant::PIRONMAN5;

    use super::*;

    fn test_state() -> DashboardState {
        DashboardState::new(
            PIRONMAN5.device_info("0.1.0"),
            PIRONMAN5.id,
            false,
            ConfigDocument::with_system(Map::new()),
        )
    }

    async fn next_frame(body: &mut axum::body::Body) -> String {
        let frame = body.frame().await.unwrap().unwrap();
        let data = frame.into_data().unwrap();
        String::from_utf8(data.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn should_emit_published_status_as_event() {
        let state = test_state();
        let mut body = stream(State(state.clone())).await.into_response().into_body();

        let mut values = Map::new();
        values.insert("cpu_temperature".into(), json!(48.5));
        state.publish_status(Status::new(values));

        let frame = next_frame(&mut body).await;
        assert!(frame.contains("event: status\n"), "frame: {frame:?}");
        assert!(frame.ends_with("\n\n"), "frame: {frame:?}");
        let data = frame
            .lines()
            .find_map(|line| line.strip_prefix("data: "))
            .unwrap();
        let payload: Value = serde_json::from_str(data).unwrap();
        assert_eq!(payload["values"]["cpu_temperature"], json!(48.5));
        assert!(payload["timestamp"].is_string());
    }

    #[tokio::test]
    async fn should_emit_one_event_per_status_in_order() {
        let state = test_state();
        let mut body = stream(State(state.clone())).await.into_response().into_body();

        for speed in [1, 2] {
            let mut values = Map::new();
            values.insert("fan_speed".into(), json!(speed));
            state.publish_status(Status::new(values));
        }

        let first = next_frame(&mut body).await;
        let second = next_frame(&mut body).await;
        assert!(first.contains(r#""fan_speed":1"#), "frame: {first:?}");
        assert!(second.contains(r#""fan_speed":2"#), "frame: {second:?}");
    }
}
