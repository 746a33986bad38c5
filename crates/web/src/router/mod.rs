//! The route table.
//!
//! A [`Router`] is an ordered list of `(pattern, handler)` entries. Patterns
//! are regular expressions matched at the *start* of the request path: a
//! route for `/users/(\d+)` also matches `/users/123/extra` and captures
//! `"123"`. Anchor the pattern with `$` to require the whole path to match.
//!
//! Entries are tried in insertion order and the first match wins, even when a
//! later pattern would also match.
//!
//! ```
//! use tonkey_web::handler_fn;
//! use tonkey_web::router::{RouteMatch, Router};
//!
//! let router = Router::new()
//!     .route(r"^/greet/(\w+)$", handler_fn(|_req, captures| format!("Hi {}", captures.get(0).unwrap_or_default())))
//!     .unwrap();
//!
//! match router.at("/greet/Ann") {
//!     RouteMatch::Matched { captures, .. } => assert_eq!(captures.get(0), Some("Ann")),
//!     RouteMatch::NotMatched => unreachable!(),
//! }
//! assert!(!router.at("/missing").is_matched());
//! ```

mod captures;

pub use captures::Captures;

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::handler::Handler;

#[derive(Error, Debug)]
pub enum RouteError {
    #[error("invalid route pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl RouteError {
    pub fn invalid_pattern<S: ToString>(pattern: S, source: regex::Error) -> Self {
        Self::InvalidPattern { pattern: pattern.to_string(), source }
    }
}

/// Ordered table of routes
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

/// A single entry of the route table
pub struct Route {
    pattern: String,
    regex: Regex,
    names: Arc<[Option<String>]>,
    handler: Box<dyn Handler>,
}

/// Result of matching a path against the table
pub enum RouteMatch<'router> {
    Matched { handler: &'router dyn Handler, captures: Captures },
    NotMatched,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Appends a route. The pattern is only validated by compiling it.
    pub fn add_route<H>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, RouteError>
    where
        H: Handler + 'static,
    {
        let route = Route::new(pattern, Box::new(handler))?;
        self.routes.push(route);
        Ok(self)
    }

    /// Builder-style [`add_route`](Self::add_route).
    pub fn route<H>(mut self, pattern: &str, handler: H) -> Result<Self, RouteError>
    where
        H: Handler + 'static,
    {
        self.add_route(pattern, handler)?;
        Ok(self)
    }

    /// Matches a path against the table
    ///
    /// Returns the handler of the first route whose pattern matches a leading
    /// part of `path`, together with the captured groups.
    pub fn at<'router>(&'router self, path: &str) -> RouteMatch<'router> {
        for route in &self.routes {
            if let Some(captures) = route.captures(path) {
                debug!(path, pattern = route.pattern(), "route matched");
                return RouteMatch::Matched { handler: route.handler(), captures };
            }
        }

        debug!(path, "no route matched");
        RouteMatch::NotMatched
    }

    /// A new table with the entries of `left` followed by those of `right`.
    pub fn merge(mut left: Router, right: Router) -> Router {
        left.extend(right);
        left
    }

    /// Appends all entries of `other` after the existing ones, keeping their order.
    pub fn extend(&mut self, other: Router) {
        self.routes.extend(other.routes);
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// The patterns in match order
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(Route::pattern)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

impl Debug for Router {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router").field("patterns", &self.patterns().collect::<Vec<_>>()).finish()
    }
}

impl Route {
    fn new(pattern: &str, handler: Box<dyn Handler>) -> Result<Self, RouteError> {
        // anchor at the start only, trailing path content is allowed
        let regex = Regex::new(&format!("^(?:{pattern})")).map_err(|e| RouteError::invalid_pattern(pattern, e))?;
        let names = regex.capture_names().skip(1).map(|name| name.map(str::to_string)).collect();

        Ok(Self { pattern: pattern.to_string(), regex, names, handler })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn handler(&self) -> &dyn Handler {
        self.handler.as_ref()
    }

    fn captures(&self, path: &str) -> Option<Captures> {
        let found = self.regex.captures(path)?;
        let groups = found.iter().skip(1).map(|group| group.map(|m| m.as_str().to_string())).collect();
        Some(Captures::new(groups, Arc::clone(&self.names)))
    }
}

impl Debug for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route").field("pattern", &self.pattern).finish_non_exhaustive()
    }
}

impl RouteMatch<'_> {
    #[inline]
    pub fn is_matched(&self) -> bool {
        matches!(self, RouteMatch::Matched { .. })
    }

    pub fn captures(&self) -> Option<&Captures> {
        match self {
            RouteMatch::Matched { captures, .. } => Some(captures),
            RouteMatch::NotMatched => None,
        }
    }
}

impl Debug for RouteMatch<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteMatch::Matched { captures, .. } => f.debug_struct("Matched").field("captures", captures).finish_non_exhaustive(),
            RouteMatch::NotMatched => f.write_str("NotMatched"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RouteError, RouteMatch, Router};
    use crate::handler::{handler_fn, Handler};
    use crate::request::Request;
    use crate::response::Response;
    use crate::router::Captures;
    use tonkey_http::protocol::Environ;

    fn status_of(handler: &dyn Handler, captures: &Captures) -> u16 {
        let environ = Environ::default();
        let response = handler.call(&Request::new(&environ), captures).unwrap();
        response.status_code()
    }

    fn tagged(status: u16) -> impl Handler {
        handler_fn(move |_req, _captures| Response::builder().status(status).build())
    }

    fn router() -> Router {
        Router::new()
            .route(r"^/users/(\d+)", tagged(201))
            .unwrap()
            .route(r"^/users/(\w+)", tagged(202))
            .unwrap()
            .route(r"^/$", tagged(203))
            .unwrap()
            .route(r"^/files/(?P<dir>\w+)(?:/(?P<name>[\w.]+))?", tagged(204))
            .unwrap()
    }

    #[test]
    fn test_first_match_wins() {
        let router = router();

        match router.at("/users/42") {
            RouteMatch::Matched { handler, captures } => {
                assert_eq!(status_of(handler, &captures), 201);
                assert_eq!(captures.iter().collect::<Vec<_>>(), vec![Some("42")]);
            }
            RouteMatch::NotMatched => panic!("expect /users/42 to match"),
        }

        match router.at("/users/ann") {
            RouteMatch::Matched { handler, captures } => {
                assert_eq!(status_of(handler, &captures), 202);
                assert_eq!(captures.get(0), Some("ann"));
            }
            RouteMatch::NotMatched => panic!("expect /users/ann to match"),
        }
    }

    #[test]
    fn test_not_matched() {
        let router = router();
        assert!(!router.at("/missing").is_matched());
        assert!(!router.at("/index").is_matched());
        assert!(router.at("/missing").captures().is_none());
    }

    #[test]
    fn test_prefix_semantics() {
        let router = router();

        let route_match = router.at("/users/123/extra");
        assert!(route_match.is_matched());
        assert_eq!(route_match.captures().unwrap().get(0), Some("123"));
    }

    #[test]
    fn test_match_is_anchored_at_start() {
        let router = Router::new().route(r"/users/(\d+)", tagged(200)).unwrap();
        assert!(!router.at("/api/users/1").is_matched());
    }

    #[test]
    fn test_optional_and_named_groups() {
        let router = router();

        let route_match = router.at("/files/docs");
        let captures = route_match.captures().unwrap();
        assert_eq!(captures.len(), 2);
        assert_eq!(captures.get(0), Some("docs"));
        assert_eq!(captures.get(1), None);
        assert_eq!(captures.name("dir"), Some("docs"));
        assert_eq!(captures.name("name"), None);

        let route_match = router.at("/files/docs/readme.md");
        let captures = route_match.captures().unwrap();
        assert_eq!(captures.name("name"), Some("readme.md"));
        assert_eq!(captures.as_slice(), &[Some("docs".to_string()), Some("readme.md".to_string())]);
    }

    #[test]
    fn test_merge_keeps_left_before_right() {
        let left = Router::new().route(r"^/a", tagged(210)).unwrap().route(r"^/shared", tagged(211)).unwrap();
        let right = Router::new().route(r"^/shared", tagged(220)).unwrap().route(r"^/b", tagged(221)).unwrap();

        let merged = Router::merge(left, right);
        assert_eq!(merged.patterns().collect::<Vec<_>>(), vec![r"^/a", r"^/shared", r"^/shared", r"^/b"]);

        match merged.at("/shared") {
            RouteMatch::Matched { handler, captures } => assert_eq!(status_of(handler, &captures), 211),
            RouteMatch::NotMatched => panic!("expect /shared to match"),
        }
        assert!(merged.at("/b").is_matched());
    }

    #[test]
    fn test_add_route_in_place() {
        let mut router = Router::new();
        router.add_route(r"^/one", tagged(200)).unwrap().add_route(r"^/two", tagged(200)).unwrap();

        assert_eq!(router.len(), 2);
        assert!(!router.is_empty());
    }

    #[test]
    fn test_invalid_pattern() {
        let result = Router::new().route(r"^/users/(\d+", tagged(200));
        assert!(matches!(result, Err(RouteError::InvalidPattern { pattern, .. }) if pattern == r"^/users/(\d+"));
    }

    #[test]
    fn test_router_is_send_and_sync() {
        fn check<T: Send + Sync>() {}
        check::<Router>();
    }
}
