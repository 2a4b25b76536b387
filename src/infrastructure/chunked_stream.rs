// Chunked JSON streaming utilities
use async_compression::tokio::bufread::BrotliEncoder;
use axum::body::Body;
use axum::http::{Response, StatusCode, header};
use axum::response::IntoResponse;
use bytes::{BufMut, Bytes, BytesMut};
use futures::StreamExt;
use futures::stream::Stream;
use tokio::io::AsyncReadExt;

use crate::domain::dashboard::StreamMessage;

/// Create a chunked streaming response of length-prefixed JSON frames.
pub async fn chunked_json_stream<S>(
    stream: S,
    compress: bool,
) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = StreamMessage> + Send + 'static,
{
    let byte_stream = stream.then(move |msg| async move { serialize_chunk(msg, compress).await });

    let body = Body::from_stream(byte_stream);

    // NOTE: We do NOT set Content-Encoding here because individual
    // chunks are compressed, not the HTTP response as a whole. Setting
    // it would make clients run stream decompression over the frame
    // protocol and corrupt the chunk boundaries.
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::TRANSFER_ENCODING, "chunked");

    response
        .body(body)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Serialize a single StreamMessage to a chunk
async fn serialize_chunk(msg: StreamMessage, compress: bool) -> Result<Bytes, std::io::Error> {
    // 1. Serialize to JSON
    let buffer =
        serde_json::to_vec(&msg).map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    // 2. Optionally compress
    let payload = if compress {
        let cursor = std::io::Cursor::new(buffer);
        let mut encoder = BrotliEncoder::new(cursor);
        let mut compressed = Vec::new();
        encoder.read_to_end(&mut compressed).await?;
        compressed
    } else {
        buffer
    };

    // 3. Prepend length (4 bytes, big-endian)
    let length = payload.len() as u32;
    let mut chunk = BytesMut::with_capacity(4 + payload.len());
    chunk.put_u32(length);
    chunk.put_slice(&payload);

    Ok(chunk.freeze())
}

/// Helper to create a streaming response from a receiver
pub async fn stream_from_receiver(
    mut rx: tokio::sync::mpsc::Receiver<StreamMessage>,
    compress: bool,
) -> impl IntoResponse {
    let stream = async_stream::stream! {
        while let Some(msg) = rx.recv().await {
            yield msg;
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
    use crate::domain::dashboard::TileUpdate;

    #[tokio::test]
    async fn test_serialize_chunk_frames_the_payload() {
        let msg = StreamMessage::TileUpdate(TileUpdate {
            id: "lsi".to_string(),
            value: 0.2,
        });

        let chunk = serialize_chunk(msg, false).await.unwrap();

        let length = u32::from_be_bytes(chunk[0..4].try_into().unwrap()) as usize;
        assert_eq!(length, chunk.len() - 4);

        let value: serde_json::Value = serde_json::from_slice(&chunk[4..]).unwrap();
        assert_eq!(value["type"], "tileUpdate");
        assert_eq!(value["payload"]["id"], "lsi");
        assert_eq!(value["payload"]["value"], 0.2);
    }
}
