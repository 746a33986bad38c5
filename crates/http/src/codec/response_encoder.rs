//! Response encoder writing the announced head and then the body chunks.
//!
//! Every response is close-delimited: the encoder always adds
//! `connection: close` and never frames the body, the connection is shut down
//! after the last chunk instead.

use bytes::{BufMut, BytesMut};
use http::header;
use tokio_util::codec::Encoder;
use tracing::error;

use crate::protocol::{Message, ResponseHead, SendError};

/// Initial buffer size allocated for header serialization
const INIT_HEADER_SIZE: usize = 4 * 1024;

#[derive(Debug, Default)]
pub struct ResponseEncoder {
    head_sent: bool,
}

impl ResponseEncoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Encoder<Message> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, item: Message, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match item {
            Message::Header(head) => {
                if self.head_sent {
                    error!("expect payload item but receive response head");
                    return Err(SendError::out_of_order("payload", "response head"));
                }
                self.head_sent = true;
                encode_head(&head, dst);
                Ok(())
            }

            Message::Payload(bytes) => {
                if !self.head_sent {
                    error!("expect response header but receive payload item");
                    return Err(SendError::out_of_order("response head", "payload"));
                }
                dst.extend_from_slice(&bytes);
                Ok(())
            }
        }
    }
}

fn encode_head(head: &ResponseHead, dst: &mut BytesMut) {
    dst.reserve(INIT_HEADER_SIZE);

    dst.put_slice(b"HTTP/1.1 ");
    dst.put_slice(head.status().as_bytes());
    dst.put_slice(b"\r\n");

    for (name, value) in head.headers() {
        if name.eq_ignore_ascii_case(header::CONNECTION.as_str()) {
            continue;
        }
        dst.put_slice(name.as_bytes());
        dst.put_slice(b": ");
        dst.put_slice(value.as_bytes());
        dst.put_slice(b"\r\n");
    }

    dst.put_slice(b"connection: close\r\n");
    dst.put_slice(b"\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_encode_head_and_payload() {
        let mut encoder = ResponseEncoder::new();
        let mut dst = BytesMut::new();

        let head = ResponseHead::new("200 OK", vec![("content-type".into(), "text/html; charset=utf-8".into())]);
        encoder.encode(Message::Header(head), &mut dst).unwrap();
        encoder.encode(Message::Payload(Bytes::from_static(b"Hi Ann")), &mut dst).unwrap();

        assert_eq!(
            &dst[..],
            &b"HTTP/1.1 200 OK\r\ncontent-type: text/html; charset=utf-8\r\nconnection: close\r\n\r\nHi Ann"[..]
        );
    }

    #[test]
    fn test_connection_header_is_replaced() {
        let mut encoder = ResponseEncoder::new();
        let mut dst = BytesMut::new();

        let head = ResponseHead::new("204 No Content", vec![("Connection".into(), "keep-alive".into())]);
        encoder.encode(Message::Header(head), &mut dst).unwrap();

        assert_eq!(&dst[..], &b"HTTP/1.1 204 No Content\r\nconnection: close\r\n\r\n"[..]);
    }

    #[test]
    fn test_payload_before_head() {
        let mut encoder = ResponseEncoder::new();
        let mut dst = BytesMut::new();

        let result = encoder.encode(Message::Payload(Bytes::from_static(b"x")), &mut dst);
        assert!(matches!(result, Err(SendError::OutOfOrder { expected: "response head", .. })));
    }

    #[test]
    fn test_head_twice() {
        let mut encoder = ResponseEncoder::new();
        let mut dst = BytesMut::new();

        encoder.encode(Message::Header(ResponseHead::plain_text("200 OK")), &mut dst).unwrap();
        let result = encoder.encode(Message::Header(ResponseHead::plain_text("200 OK")), &mut dst);
        assert!(matches!(result, Err(SendError::OutOfOrder { expected: "payload", .. })));
    }
}
