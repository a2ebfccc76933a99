//! Request data handed to the handler.

use bytes::Bytes;
use serde::de::DeserializeOwned;

use bucketstore_model::error::BucketStoreError;

/// Decoded query string. Keys may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// Decode a raw query string (`a=1&b=2`).
    #[must_use]
    pub fn parse(query: Option<&str>) -> Self {
        let pairs = query
            .map(|q| {
                form_urlencoded::parse(q.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default();
        Self(pairs)
    }

    /// First non-empty value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, v)| k == name && !v.is_empty())
            .map(|(_, v)| v.as_str())
    }

    /// Owned variant of [`QueryParams::get`].
    #[must_use]
    pub fn get_owned(&self, name: &str) -> Option<String> {
        self.get(name).map(ToOwned::to_owned)
    }

    /// All non-empty values for any of `names`, in request order.
    ///
    /// Array parameters arrive as `filenames[]=a&filenames[]=b` from browser
    /// query serializers and as plain repeated `filenames=a&filenames=b` from
    /// other clients, so callers pass both spellings.
    #[must_use]
    pub fn get_all(&self, names: &[&str]) -> Vec<String> {
        self.0
            .iter()
            .filter(|(k, v)| names.contains(&k.as_str()) && !v.is_empty())
            .map(|(_, v)| v.clone())
            .collect()
    }

    /// Whether no parameters were given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Everything a handler needs from an incoming request.
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    /// Decoded query string.
    pub query: QueryParams,
    /// Raw request body.
    pub body: Bytes,
    /// Id assigned by the service, echoed in `x-request-id`.
    pub request_id: String,
}

impl ApiRequest {
    /// Create a request from its parts.
    #[must_use]
    pub fn new(query: QueryParams, body: Bytes) -> Self {
        Self {
            query,
            body,
            request_id: String::new(),
        }
    }

    /// Attach the id the service assigned to this request.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    /// Deserialize the JSON body. An empty body yields `T::default()`.
    pub fn json_body<T: DeserializeOwned + Default>(&self) -> Result<T, BucketStoreError> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(T::default());
        }
        serde_json::from_slice(&self.body).map_err(|e| {
            BucketStoreError::validation(format!("request body is not valid JSON: {e}"))
        })
    }
}
