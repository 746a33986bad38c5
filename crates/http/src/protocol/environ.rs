//! The request environment handed from the gateway to an application.
//!
//! An [`Environ`] carries everything the application may look at for one
//! inbound call: the method, the path, the raw query string and the request
//! headers. It is built either by the [`RequestDecoder`](crate::codec::RequestDecoder)
//! from a parsed request head, or by hand through [`Environ::builder`].

use std::net::SocketAddr;

use http::{HeaderMap, HeaderName, HeaderValue, Method, Uri, Version};
use percent_encoding::percent_decode_str;

use crate::protocol::ParseError;

/// The per-call request environment.
///
/// The path is optional: a gateway that does not know the path leaves it
/// unset and consumers fall back to `/`.
#[derive(Debug, Clone)]
pub struct Environ {
    method: Method,
    path: Option<String>,
    query_string: String,
    version: Version,
    headers: HeaderMap,
    remote_addr: Option<SocketAddr>,
}

impl Default for Environ {
    fn default() -> Self {
        Self {
            method: Method::GET,
            path: None,
            query_string: String::new(),
            version: Version::HTTP_11,
            headers: HeaderMap::new(),
            remote_addr: None,
        }
    }
}

impl Environ {
    pub fn builder() -> EnvironBuilder {
        EnvironBuilder { inner: Environ::default() }
    }

    /// Builds an environ from a request target as it appears on the request line.
    ///
    /// The path is percent-decoded and must decode to UTF-8. The query string
    /// stays raw, it is decoded by whoever parses it.
    pub fn from_request_target(method: Method, uri: &Uri, version: Version, headers: HeaderMap) -> Result<Self, ParseError> {
        let path = percent_decode_str(uri.path()).decode_utf8().map_err(|e| ParseError::invalid_path(uri.path(), e))?;

        Ok(Self {
            method,
            path: Some(path.into_owned()),
            query_string: uri.query().unwrap_or_default().to_string(),
            version,
            headers,
            remote_addr: None,
        })
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request path, `None` when the gateway did not provide one.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// The raw, undecoded query string; empty when the request had none.
    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }

    pub fn set_remote_addr(&mut self, remote_addr: SocketAddr) {
        self.remote_addr = Some(remote_addr);
    }
}

/// Builder for [`Environ`], mostly useful for tests and for gateways that do
/// not speak HTTP on the wire.
#[derive(Debug)]
pub struct EnvironBuilder {
    inner: Environ,
}

impl EnvironBuilder {
    pub fn method(mut self, method: Method) -> Self {
        self.inner.method = method;
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.inner.path = Some(path.into());
        self
    }

    pub fn query_string(mut self, query_string: impl Into<String>) -> Self {
        self.inner.query_string = query_string.into();
        self
    }

    pub fn version(mut self, version: Version) -> Self {
        self.inner.version = version;
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.inner.headers.append(name, value);
        self
    }

    pub fn remote_addr(mut self, remote_addr: SocketAddr) -> Self {
        self.inner.remote_addr = Some(remote_addr);
        self
    }

    pub fn build(self) -> Environ {
        self.inner
    }
}
