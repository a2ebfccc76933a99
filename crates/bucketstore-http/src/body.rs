//! Response body type for the Bucket Store API.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use http_body_util::Full;

/// Response body for Bucket Store HTTP responses.
///
/// Responses are JSON documents, except CORS preflight answers which carry
/// no body at all.
#[derive(Debug, Default)]
pub enum BucketStoreResponseBody {
    /// A serialized JSON document.
    Json(Full<Bytes>),
    /// No body.
    #[default]
    Empty,
}

impl BucketStoreResponseBody {
    /// Wrap already-serialized JSON bytes.
    #[must_use]
    pub fn from_json(json: Vec<u8>) -> Self {
        Self::Json(Full::new(Bytes::from(json)))
    }

    /// Serialize a JSON value into a body.
    #[must_use]
    pub fn from_value(value: &serde_json::Value) -> Self {
        // `Value` serialization into a Vec cannot fail.
        Self::from_json(serde_json::to_vec(value).unwrap_or_default())
    }

    /// Create an empty body.
    #[must_use]
    pub fn empty() -> Self {
        Self::Empty
    }
}

impl http_body::Body for BucketStoreResponseBody {
    type Data = Bytes;
    type Error = std::io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<http_body::Frame<Self::Data>, Self::Error>>> {
        match self.get_mut() {
            Self::Json(full) => Pin::new(full)
                .poll_frame(cx)
                .map_err(|never| match never {}),
            Self::Empty => Poll::Ready(None),
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            Self::Json(full) => full.is_end_stream(),
            Self::Empty => true,
        }
    }

    fn size_hint(&self) -> http_body::SizeHint {
        match self {
            Self::Json(full) => full.size_hint(),
            Self::Empty => http_body::SizeHint::with_exact(0),
        }
    }
}
