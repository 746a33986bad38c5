use std::io;
use std::str::Utf8Error;

use thiserror::Error;

/// Failure of one gateway connection, split by the side that failed.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("can't read request: {source}")]
    Request {
        #[from]
        source: ParseError,
    },

    #[error("can't write response: {source}")]
    Response {
        #[from]
        source: SendError,
    },
}

/// The request head could not be turned into an environ.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("request head has {current_size} bytes, limit is {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("request has more than {max_num} headers")]
    TooManyHeaders { max_num: usize },

    #[error("malformed request head: {reason}")]
    InvalidHeader { reason: String },

    #[error("unsupported http version: {0:?}")]
    InvalidVersion(Option<u8>),

    #[error("unknown request method")]
    InvalidMethod,

    #[error("malformed request target")]
    InvalidUri,

    #[error("path '{path}' is not utf-8 once decoded: {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: Utf8Error,
    },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn too_many_headers(max_num: usize) -> Self {
        Self::TooManyHeaders { max_num }
    }

    pub fn invalid_header<S: ToString>(reason: S) -> Self {
        Self::InvalidHeader { reason: reason.to_string() }
    }

    pub fn invalid_path<S: ToString>(path: S, source: Utf8Error) -> Self {
        Self::InvalidPath { path: path.to_string(), source }
    }
}

/// The response could not be produced or written.
#[derive(Error, Debug)]
pub enum SendError {
    #[error("application failed while producing the body: {reason}")]
    Body { reason: String },

    #[error("application failed: {reason}")]
    Application { reason: String },

    #[error("{found} sent while expecting {expected}")]
    OutOfOrder { expected: &'static str, found: &'static str },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn body<S: ToString>(reason: S) -> Self {
        Self::Body { reason: reason.to_string() }
    }

    pub fn application<S: ToString>(reason: S) -> Self {
        Self::Application { reason: reason.to_string() }
    }

    pub fn out_of_order(expected: &'static str, found: &'static str) -> Self {
        Self::OutOfOrder { expected, found }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
