use axum::{
    body::Body,
    http::header,
    response::{IntoResponse, Response},
};
use futures::TryStreamExt;

use crate::llm_client::FragmentStream;

/// Streams fragments to the client as they arrive.
///
/// Errors after the first byte cannot change the status code any more; they
/// are logged and end the body early. A client disconnect drops the body,
/// which drops the upstream stream.
pub fn text_stream(stream: FragmentStream) -> Response {
    let stream = stream.inspect_err(|e| tracing::error!("Generation stream failed: {e}"));
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(stream),
    )
        .into_response()
}
