//! Incremental decoding of the server's newline-delimited JSON chat stream.
//!
//! Each line is `{"message":{"role":"assistant","content":"..."},"done":false}`.
//! A line carrying `"error"` aborts the stream; `"done":true` ends it.

use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde::Deserialize;

use super::{FragmentStream, GatewayError};

#[derive(Debug, Deserialize)]
struct StreamLine {
    #[serde(default)]
    message: Option<StreamMessage>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, PartialEq)]
struct LineEvent {
    fragment: Option<String>,
    done: bool,
}

/// Wraps a raw byte stream into a stream of text fragments.
///
/// Pulls from `bytes` only when the consumer polls; dropping the returned
/// stream drops `bytes`, which closes the underlying connection.
pub fn decode_chat_stream<S, E>(bytes: S) -> FragmentStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Into<GatewayError> + Send + 'static,
{
    Box::pin(fragments(bytes))
}

fn fragments<S, E>(bytes: S) -> impl Stream<Item = Result<String, GatewayError>> + Send
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Into<GatewayError> + Send + 'static,
{
    async_stream::try_stream! {
        let mut bytes = Box::pin(bytes);
        let mut buffer = LineBuffer::default();
        let mut finished = false;

        'read: while let Some(chunk) = bytes.next().await {
            let chunk = chunk.map_err(|e| -> GatewayError { e.into() })?;
            for line in buffer.push(&chunk) {
                let event = decode_line(&line)?;
                if let Some(fragment) = event.fragment {
                    yield fragment;
                }
                if event.done {
                    finished = true;
                    break 'read;
                }
            }
        }

        if !finished {
            if let Some(line) = buffer.finish() {
                let event = decode_line(&line)?;
                if let Some(fragment) = event.fragment {
                    yield fragment;
                }
            }
        }
    }
}

fn decode_line(line: &str) -> Result<LineEvent, GatewayError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(LineEvent {
            fragment: None,
            done: false,
        });
    }

    let parsed: StreamLine = serde_json::from_str(line)?;
    if let Some(error) = parsed.error {
        return Err(GatewayError::Stream(error));
    }

    let fragment = parsed
        .message
        .map(|m| m.content)
        .filter(|content| !content.is_empty());

    Ok(LineEvent {
        fragment,
        done: parsed.done,
    })
}

/// Splits an arbitrarily chunked byte sequence into complete lines.
/// Bytes are held until a newline arrives so multi-byte characters split
/// across chunks decode correctly.
#[derive(Debug, Default)]
struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            lines.push(String::from_utf8_lossy(&line[..pos]).into_owned());
        }
        lines
    }

    fn finish(&mut self) -> Option<String> {
        if self.pending.iter().all(u8::is_ascii_whitespace) {
            return None;
        }
        let rest = std::mem::take(&mut self.pending);
        Some(String::from_utf8_lossy(&rest).into_owned())
    }
}
