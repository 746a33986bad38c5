use std::fmt::{Debug, Formatter};
use std::iter::FusedIterator;

use bytes::Bytes;

use crate::response::{Charset, ResponseError};

/// One element of a response body: either text that still has to be encoded,
/// or bytes that go out as they are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    Text(String),
    Bytes(Bytes),
}

impl From<String> for Chunk {
    fn from(value: String) -> Self {
        Chunk::Text(value)
    }
}

impl From<&'static str> for Chunk {
    fn from(value: &'static str) -> Self {
        Chunk::Text(value.to_string())
    }
}

impl From<Bytes> for Chunk {
    fn from(value: Bytes) -> Self {
        Chunk::Bytes(value)
    }
}

impl From<Vec<u8>> for Chunk {
    fn from(value: Vec<u8>) -> Self {
        Chunk::Bytes(Bytes::from(value))
    }
}

impl From<&'static [u8]> for Chunk {
    fn from(value: &'static [u8]) -> Self {
        Chunk::Bytes(Bytes::from_static(value))
    }
}

type ChunkIter = Box<dyn Iterator<Item = Chunk> + Send>;

/// The body of a [`Response`](crate::response::Response).
///
/// A body is consumed exactly once, through [`Response::into_chunks`](crate::response::Response::into_chunks).
pub struct Body {
    kind: Kind,
}

enum Kind {
    Empty,
    Once(Chunk),
    Iter(ChunkIter),
}

impl Body {
    pub fn empty() -> Self {
        Self { kind: Kind::Empty }
    }

    /// A body made of exactly one chunk, even if that chunk is empty.
    pub fn once(chunk: impl Into<Chunk>) -> Self {
        Self { kind: Kind::Once(chunk.into()) }
    }

    /// A lazy body; the iterator is only advanced while the response is being written.
    pub fn iter<I>(iter: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Chunk> + 'static,
        I::IntoIter: Send + 'static,
    {
        Self { kind: Kind::Iter(Box::new(iter.into_iter().map(Into::into))) }
    }

    pub(crate) fn into_chunks(self, charset: Charset) -> Chunks {
        Chunks { kind: self.kind, charset }
    }
}

impl Debug for Body {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            Kind::Empty => f.write_str("Body::Empty"),
            Kind::Once(chunk) => f.debug_tuple("Body::Once").field(chunk).finish(),
            Kind::Iter(_) => f.write_str("Body::Iter(..)"),
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<()> for Body {
    fn from(_: ()) -> Self {
        Self::empty()
    }
}

impl From<String> for Body {
    fn from(value: String) -> Self {
        if value.is_empty() { Self::empty() } else { Self::once(value) }
    }
}

impl From<&'static str> for Body {
    fn from(value: &'static str) -> Self {
        if value.is_empty() { Self::empty() } else { Self::once(value) }
    }
}

impl From<Bytes> for Body {
    fn from(value: Bytes) -> Self {
        if value.is_empty() { Self::empty() } else { Self::once(value) }
    }
}

impl From<Vec<u8>> for Body {
    fn from(value: Vec<u8>) -> Self {
        Self::from(Bytes::from(value))
    }
}

impl From<Vec<Chunk>> for Body {
    fn from(value: Vec<Chunk>) -> Self {
        Self::iter(value)
    }
}

impl From<Option<String>> for Body {
    fn from(option: Option<String>) -> Self {
        option.map(Self::from).unwrap_or_default()
    }
}

/// The encoded byte stream of a response.
///
/// Bytes chunks are emitted verbatim, exactly once; text chunks are encoded
/// with the response charset. The stream is single pass and fused: once it
/// returned `None`, or an encoding error, it keeps returning `None`.
pub struct Chunks {
    kind: Kind,
    charset: Charset,
}

impl Chunks {
    pub fn charset(&self) -> Charset {
        self.charset
    }

    fn encode(&self, chunk: Chunk) -> Result<Bytes, ResponseError> {
        match chunk {
            Chunk::Bytes(bytes) => Ok(bytes),
            Chunk::Text(text) => self.charset.encode(&text),
        }
    }
}

impl Iterator for Chunks {
    type Item = Result<Bytes, ResponseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let chunk = match std::mem::replace(&mut self.kind, Kind::Empty) {
            Kind::Empty => return None,
            Kind::Once(chunk) => chunk,
            Kind::Iter(mut iter) => match iter.next() {
                Some(chunk) => {
                    self.kind = Kind::Iter(iter);
                    chunk
                }
                None => return None,
            },
        };

        let result = self.encode(chunk);
        if result.is_err() {
            self.kind = Kind::Empty;
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.kind {
            Kind::Empty => (0, Some(0)),
            Kind::Once(_) => (1, Some(1)),
            Kind::Iter(iter) => iter.size_hint(),
        }
    }
}

impl FusedIterator for Chunks {}

impl Debug for Chunks {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunks").field("charset", &self.charset).finish_non_exhaustive()
    }
}
