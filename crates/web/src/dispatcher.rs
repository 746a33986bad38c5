//! Turns an inbound [`Environ`] into a [`Response`].
//!
//! The [`Dispatcher`] owns the route table of the hosted application. For
//! every call it builds a [`Request`] view, looks the path up and invokes the
//! matched handler, or answers `404 Not Found` when nothing matches. It also
//! implements the gateway [`Application`] contract, so it can be handed
//! straight to a [`GatewayConnection`](tonkey_http::connection::GatewayConnection).

use std::sync::Arc;

use tonkey_http::handler::{Application, StartResponse};
use tonkey_http::protocol::Environ;
use tracing::{debug, info};

use crate::config::{AppRegistry, Config, ConfigError};
use crate::handler::HandlerError;
use crate::request::Request;
use crate::response::{Chunks, Response, ResponseError};
use crate::router::{RouteMatch, Router};

const NOT_FOUND_BODY: &str = "<h1>Not Found</h1>";

#[derive(Debug, Clone)]
pub struct Dispatcher {
    router: Arc<Router>,
}

impl Dispatcher {
    pub fn new(router: Router) -> Self {
        Self { router: Arc::new(router) }
    }

    /// Resolves the application named by `config` in `registry`.
    pub fn from_config(config: &Config, registry: &AppRegistry) -> Result<Self, ConfigError> {
        let router = registry.resolve(config.app())?;
        info!(app = config.app(), routes = router.len(), "application resolved");
        Ok(Self::new(router))
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Routes one request and runs its handler.
    ///
    /// A path without a matching route yields a `404` response; a handler
    /// error is returned as is.
    pub fn dispatch(&self, environ: &Environ) -> Result<Response, HandlerError> {
        let request = Request::new(environ);

        match self.router.at(request.path()) {
            RouteMatch::Matched { handler, captures } => handler.call(&request, &captures),
            RouteMatch::NotMatched => {
                debug!(path = request.path(), "answer with not found");
                Ok(Response::builder().status(404).body(NOT_FOUND_BODY).build())
            }
        }
    }
}

impl From<Router> for Dispatcher {
    fn from(router: Router) -> Self {
        Self::new(router)
    }
}

impl Application for Dispatcher {
    type Body = Chunks;
    type BodyError = ResponseError;
    type Error = HandlerError;

    fn call(&self, environ: &Environ, start_response: &mut dyn StartResponse) -> Result<Self::Body, Self::Error> {
        let response = self.dispatch(environ)?;
        start_response.start_response(response.status(), &response.header_items());
        Ok(response.into_chunks())
    }
}

#[cfg(test)]
mod tests {
    use super::Dispatcher;
    use crate::config::{AppRegistry, Config, ConfigError};
    use crate::handler::handler_fn;
    use crate::response::{Chunk, Response};
    use crate::router::Router;
    use bytes::Bytes;
    use http::{HeaderMap, Method, Uri, Version};
    use std::io;
    use tonkey_http::handler::Application;
    use tonkey_http::protocol::Environ;

    fn router() -> Router {
        Router::new()
            .route(r"^/greet/(\w+)$", handler_fn(|_req, captures| format!("Hi {}", captures.get(0).unwrap_or_default())))
            .unwrap()
            .route(r"^/search", handler_fn(|req, _captures| format!("q={}", req.query().get("q").unwrap_or("-"))))
            .unwrap()
            .route(r"^/stream", handler_fn(|_req, _captures| Response::new(vec![Chunk::from("a"), Chunk::from(Bytes::from("b"))])))
            .unwrap()
            .route(r"^/fail", handler_fn(|_req, _captures| Err::<Response, _>(io::Error::other("database is down"))))
            .unwrap()
    }

    fn call(dispatcher: &Dispatcher, environ: &Environ) -> (String, Vec<(String, String)>, Vec<Bytes>) {
        let mut head = None;
        let chunks = dispatcher
            .call(environ, &mut |status: &str, headers: &[(String, String)]| {
                head = Some((status.to_string(), headers.to_vec()));
            })
            .unwrap();
        let chunks: Vec<Bytes> = chunks.map(Result::unwrap).collect();
        let (status, headers) = head.unwrap();
        (status, headers, chunks)
    }

    #[test]
    fn test_matched_route() {
        let dispatcher = Dispatcher::new(router());
        let environ = Environ::builder().path("/greet/Ann").build();

        let (status, headers, chunks) = call(&dispatcher, &environ);
        assert_eq!(status, "200 OK");
        assert_eq!(headers, vec![("content-type".to_string(), "text/html; charset=utf-8".to_string())]);
        assert_eq!(chunks, vec![Bytes::from_static(b"Hi Ann")]);
    }

    #[test]
    fn test_encoded_path_reaches_handler_decoded() {
        let router = Router::new()
            .route(r"^/greet/([\w ]+)$", handler_fn(|_req, captures| format!("Hi {}", captures.get(0).unwrap_or_default())))
            .unwrap();
        let dispatcher = Dispatcher::new(router);

        let uri: Uri = "/greet/Ann%20Lee".parse().unwrap();
        let environ = Environ::from_request_target(Method::GET, &uri, Version::HTTP_11, HeaderMap::new()).unwrap();

        let (status, _headers, chunks) = call(&dispatcher, &environ);
        assert_eq!(status, "200 OK");
        assert_eq!(chunks, vec![Bytes::from_static(b"Hi Ann Lee")]);
    }

    #[test]
    fn test_not_found() {
        let dispatcher = Dispatcher::new(router());
        let environ = Environ::builder().path("/missing").build();

        let (status, _headers, chunks) = call(&dispatcher, &environ);
        assert_eq!(status, "404 Not Found");
        let body = String::from_utf8(chunks.concat()).unwrap();
        assert!(body.contains("Not Found"));
    }

    #[test]
    fn test_missing_path_is_root() {
        let dispatcher = Dispatcher::new(router());
        let response = dispatcher.dispatch(&Environ::default()).unwrap();
        assert_eq!(response.status_code(), 404);
    }

    #[test]
    fn test_query_is_visible_to_handler() {
        let dispatcher = Dispatcher::new(router());
        let environ = Environ::builder().path("/search").query_string("q=rust+web").build();

        let (_status, _headers, chunks) = call(&dispatcher, &environ);
        assert_eq!(chunks, vec![Bytes::from_static(b"q=rust web")]);
    }

    #[test]
    fn test_chunks_are_emitted_once_in_order() {
        let dispatcher = Dispatcher::new(router());
        let environ = Environ::builder().path("/stream").build();

        let (_status, _headers, chunks) = call(&dispatcher, &environ);
        assert_eq!(chunks, vec![Bytes::from_static(b"a"), Bytes::from_static(b"b")]);
    }

    #[test]
    fn test_handler_error_is_not_caught() {
        let dispatcher = Dispatcher::new(router());
        let environ = Environ::builder().path("/fail").build();

        let mut announced = false;
        let result = dispatcher.call(&environ, &mut |_status: &str, _headers: &[(String, String)]| announced = true);
        assert_eq!(result.err().map(|e| e.to_string()), Some("database is down".to_string()));
        assert!(!announced);
    }

    #[test]
    fn test_from_config() {
        let mut registry = AppRegistry::new();
        registry.register("greeter", || Ok(router()));

        let config = Config::from_lookup(|name| (name == "TONKEY_APP").then(|| "greeter".to_string())).unwrap();
        let dispatcher = Dispatcher::from_config(&config, &registry).unwrap();
        assert_eq!(dispatcher.router().len(), 4);

        let config = Config::from_lookup(|name| (name == "TONKEY_APP").then(|| "other".to_string())).unwrap();
        let result = Dispatcher::from_config(&config, &registry);
        assert!(matches!(result, Err(ConfigError::UnknownApp { name }) if name == "other"));
    }
}
