//! Codec module for decoding request heads and encoding responses
//!
//! - [`RequestDecoder`]: decodes an incoming request head into an [`Environ`](crate::protocol::Environ)
//! - [`ResponseEncoder`]: encodes the announced head and the body chunks
//!
//! # Example
//!
//! ```no_run
//! use tonkey_http::codec::{RequestDecoder, ResponseEncoder};
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut request_buffer = BytesMut::from("GET / HTTP/1.1\r\n\r\n");
//! let environ = decoder.decode(&mut request_buffer);
//!
//! let encoder = ResponseEncoder::new();
//! ```

mod request_decoder;
mod response_encoder;

pub use request_decoder::RequestDecoder;
pub use response_encoder::ResponseEncoder;
