use bytes::Bytes;

/// An outbound message: the response head first, then any number of payload chunks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// The status line and the header list announced by the application
    Header(ResponseHead),
    /// A chunk of the response body
    Payload(Bytes),
}

impl Message {
    /// Returns true if this message contains payload data
    #[inline]
    pub fn is_payload(&self) -> bool {
        matches!(self, Message::Payload(_))
    }

    /// Returns true if this message contains header information
    #[inline]
    pub fn is_header(&self) -> bool {
        matches!(self, Message::Header(_))
    }
}

impl From<Bytes> for Message {
    fn from(bytes: Bytes) -> Self {
        Self::Payload(bytes)
    }
}

impl From<ResponseHead> for Message {
    fn from(head: ResponseHead) -> Self {
        Self::Header(head)
    }
}

/// What the application announced through [`StartResponse`](crate::handler::StartResponse).
///
/// The status is kept as the full `"<code> <reason>"` line; the gateway does
/// not interpret it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    status: String,
    headers: Vec<(String, String)>,
}

impl ResponseHead {
    pub fn new(status: impl Into<String>, headers: Vec<(String, String)>) -> Self {
        Self { status: status.into(), headers }
    }

    /// A head the gateway uses on its own, when the application could not produce one.
    pub fn plain_text(status: impl Into<String>) -> Self {
        Self::new(status, vec![(http::header::CONTENT_TYPE.to_string(), mime::TEXT_PLAIN_UTF_8.to_string())])
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}

