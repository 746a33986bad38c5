//! Request view handed to handlers.
//!
//! - [`Request`]: read-only view over the gateway's [`Environ`]
//! - [`QueryParams`]: the parsed query string, name to ordered values

use http::{HeaderMap, HeaderValue, Method};
use indexmap::IndexMap;
use indexmap::map;
use once_cell::unsync::OnceCell;
use tonkey_http::protocol::Environ;
use tracing::warn;

/// Read-only view over one inbound call.
///
/// The path and the raw query string are read straight from the environ.
/// The parsed query is computed on first access and reused afterwards.
#[derive(Debug)]
pub struct Request<'env> {
    environ: &'env Environ,
    query: OnceCell<QueryParams>,
}

impl<'env> Request<'env> {
    pub fn new(environ: &'env Environ) -> Self {
        Self { environ, query: OnceCell::new() }
    }

    /// The request path, `/` when the environ has none
    pub fn path(&self) -> &'env str {
        self.environ.path().unwrap_or("/")
    }

    pub fn query_string(&self) -> &'env str {
        self.environ.query_string()
    }

    /// Query parameters, parsed once per request view.
    pub fn query(&self) -> &QueryParams {
        self.query.get_or_init(|| QueryParams::parse(self.query_string()))
    }

    pub fn method(&self) -> &'env Method {
        self.environ.method()
    }

    pub fn headers(&self) -> &'env HeaderMap {
        self.environ.headers()
    }

    pub fn header(&self, name: &str) -> Option<&'env HeaderValue> {
        self.environ.headers().get(name)
    }

    pub fn environ(&self) -> &'env Environ {
        self.environ
    }
}

/// Query parameters: every name maps to the values it was given, in order.
///
/// Names iterate in the order they first appear in the query string. Pairs
/// whose value is empty are dropped, `+` decodes to a space and
/// percent-escapes are decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    inner: IndexMap<String, Vec<String>>,
}

impl QueryParams {
    pub fn parse(query_string: &str) -> Self {
        let pairs = match serde_urlencoded::from_str::<Vec<(String, String)>>(query_string) {
            Ok(pairs) => pairs,
            Err(e) => {
                warn!(cause = %e, query_string, "can't parse query string");
                return Self::default();
            }
        };

        let mut inner: IndexMap<String, Vec<String>> = IndexMap::new();
        for (name, value) in pairs.into_iter().filter(|(_, value)| !value.is_empty()) {
            inner.entry(name).or_default().push(value);
        }
        Self { inner }
    }

    /// The first value given for `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(name).and_then(|values| values.first()).map(String::as_str)
    }

    /// Every value given for `name`, in order of appearance
    pub fn get_all(&self, name: &str) -> &[String] {
        self.inner.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> map::Iter<'_, String, Vec<String>> {
        self.inner.iter()
    }

    pub fn into_inner(self) -> IndexMap<String, Vec<String>> {
        self.inner
    }
}

impl<'a> IntoIterator for &'a QueryParams {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
