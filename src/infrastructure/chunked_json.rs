// Chunked JSON streaming utilities for live simulation events
use crate::application::simulation_service::LiveEvent;
use crate::infrastructure::http_response::brotli_compress;
use axum::body::Body;
use axum::http::{Response, StatusCode, header};
use axum::response::IntoResponse;
use bytes::{BufMut, Bytes, BytesMut};
use futures::StreamExt;
use futures::stream::Stream;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Create a chunked streaming response of length-prefixed JSON frames
pub async fn chunked_json_stream<S>(stream: S, compress: bool) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = LiveEvent> + Send + 'static,
{
    let byte_stream = stream.then(move |event| async move { serialize_chunk(&event, compress).await });

    let body = Body::from_stream(byte_stream);

    // Frames are compressed one by one, so no Content-Encoding on the response.
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(body)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Serialize a single event to a length-prefixed chunk
pub async fn serialize_chunk(event: &LiveEvent, compress: bool) -> Result<Bytes, std::io::Error> {
    let buffer = serde_json::to_vec(event).map_err(std::io::Error::other)?;

    let payload = if compress {
        brotli_compress(buffer).await?
    } else {
        buffer
    };

    // 4-byte big-endian length, then the payload
    let mut chunk = BytesMut::with_capacity(4 + payload.len());
    chunk.put_u32(payload.len() as u32);
    chunk.put_slice(&payload);

    Ok(chunk.freeze())
}

/// Stream events from a broadcast subscription until the sender closes or
/// `shutdown` is cancelled. A lagging client skips what it missed.
pub async fn stream_from_subscription(
    mut rx: broadcast::Receiver<LiveEvent>,
    shutdown: CancellationToken,
    compress: bool,
) -> impl IntoResponse {
    let stream = async_stream::stream! {
        loop {
            let received = tokio::select! {
                _ = shutdown.cancelled() => break,
                received = rx.recv() => received,
            };
            match received {
                Ok(event) => yield event,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!("Live stream client lagged, skipped {} events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    };

    match chunked_json_stream(stream, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sensor::SensorReading;
    use std::time::Duration;

    #[tokio::test]
    async fn test_chunk_has_length_prefix() {
        let event = LiveEvent::Telemetry(SensorReading::default());
        let chunk = serialize_chunk(&event, false).await.unwrap();

        let length = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) as usize;
        assert_eq!(length, chunk.len() - 4);

        let decoded: serde_json::Value = serde_json::from_slice(&chunk[4..]).unwrap();
        assert_eq!(decoded["type"], "telemetry");
    }

    #[tokio::test]
    async fn test_stream_ends_when_sender_closes() {
        let (tx, rx) = broadcast::channel(4);
        tx.send(LiveEvent::Telemetry(SensorReading::default())).unwrap();
        drop(tx);

        let response = stream_from_subscription(rx, CancellationToken::new(), false)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/octet-stream");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let length = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
        assert_eq!(bytes.len(), 4 + length);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_ends_on_shutdown_while_sender_alive() {
        let (tx, rx) = broadcast::channel(4);
        let shutdown = CancellationToken::new();
        tx.send(LiveEvent::Telemetry(SensorReading::default())).unwrap();

        tokio::spawn({
            let shutdown = shutdown.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                shutdown.cancel();
            }
        });

        let response = stream_from_subscription(rx, shutdown, false).await.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let length = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
        assert_eq!(bytes.len(), 4 + length);

        assert_eq!(tx.receiver_count(), 0);
    }
}
