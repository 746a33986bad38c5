//! Request head decoder producing an [`Environ`].
//!
//! Only the request line and the header section are decoded. The gateway
//! serves a single request per connection, so whatever follows the head is
//! left in the buffer and dropped together with the connection.
//!
//! # Limits
//!
//! - Maximum number of headers: 64
//! - Maximum header size: 8KB
//! - Only HTTP/1.0 and HTTP/1.1

use bytes::BytesMut;
use http::{HeaderMap, HeaderName, HeaderValue, Method, Uri, Version};
use httparse::{Error, Status};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::ensure;
use crate::protocol::{Environ, ParseError};

/// Maximum number of headers allowed in a request
const MAX_HEADER_NUM: usize = 64;

/// Maximum size in bytes allowed for the entire header section
const MAX_HEADER_BYTES: usize = 8 * 1024;

/// Decoder for HTTP request heads implementing the [`Decoder`] trait.
#[derive(Debug, Default)]
pub struct RequestDecoder;

impl RequestDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for RequestDecoder {
    type Item = Environ;
    type Error = ParseError;

    /// Attempts to decode a request head from the provided bytes buffer.
    ///
    /// - `Ok(Some(environ))` if a complete head was parsed
    /// - `Ok(None)` if more data is needed
    /// - `Err(ParseError)` if parsing failed or a limit was exceeded
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }

        let mut headers = [httparse::EMPTY_HEADER; MAX_HEADER_NUM];
        let mut req = httparse::Request::new(&mut headers);

        let parsed_result = req.parse(src).map_err(|e| match e {
            Error::TooManyHeaders => ParseError::too_many_headers(MAX_HEADER_NUM),
            e => ParseError::invalid_header(e.to_string()),
        });

        let head_size = match parsed_result? {
            Status::Complete(head_size) => head_size,
            Status::Partial => {
                ensure!(src.len() <= MAX_HEADER_BYTES, ParseError::too_large_header(src.len(), MAX_HEADER_BYTES));
                return Ok(None);
            }
        };

        trace!(head_size, "parsed request head");
        ensure!(head_size <= MAX_HEADER_BYTES, ParseError::too_large_header(head_size, MAX_HEADER_BYTES));

        let version = match req.version {
            Some(0) => Version::HTTP_10,
            Some(1) => Version::HTTP_11,
            // Currently HTTP/2 and HTTP/3 not supported
            _ => return Err(ParseError::InvalidVersion(req.version)),
        };

        let method = req.method.ok_or(ParseError::InvalidMethod)?;
        let method = Method::from_bytes(method.as_bytes()).map_err(|_e| ParseError::InvalidMethod)?;
        let uri = req.path.ok_or(ParseError::InvalidUri)?.parse::<Uri>().map_err(|_e| ParseError::InvalidUri)?;

        let mut header_map = HeaderMap::with_capacity(req.headers.len());
        for header in req.headers.iter() {
            let name = HeaderName::from_bytes(header.name.as_bytes()).map_err(ParseError::invalid_header)?;
            let value = HeaderValue::from_bytes(header.value).map_err(ParseError::invalid_header)?;
            header_map.append(name, value);
        }

        let environ = Environ::from_request_target(method, &uri, version, header_map)?;
        let _ = src.split_to(head_size);

        Ok(Some(environ))
    }
}
