//! A micro web layer on top of the `tonkey-http` gateway.
//!
//! An application is a [`Router`]: an ordered table of regular expression
//! patterns and [`Handler`]s. The [`Dispatcher`] matches the request path
//! against the table, calls the first matching handler with a [`Request`]
//! view and the captured groups, and streams the resulting [`Response`] back
//! through the gateway.
//!
//! ```no_run
//! use tonkey_web::{handler_fn, Router, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let router = Router::new()
//!         .route(r"^/greet/(\w+)$", handler_fn(|_req, captures| format!("Hi {}", captures.get(0).unwrap_or_default())))
//!         .unwrap();
//!
//!     let server = Server::builder().router(router).address("127.0.0.1:8080").build().unwrap();
//!     server.start().await;
//! }
//! ```

pub mod config;
pub mod dispatcher;
pub mod handler;
pub mod request;
pub mod responder;
pub mod response;
pub mod router;
pub mod server;
pub mod template;

pub use config::AppRegistry;
pub use config::Config;
pub use dispatcher::Dispatcher;
pub use handler::handler_fn;
pub use handler::FnHandler;
pub use handler::Handler;
pub use handler::HandlerError;
pub use request::QueryParams;
pub use request::Request;
pub use responder::Responder;
pub use response::Body;
pub use response::Charset;
pub use response::Response;
pub use router::Captures;
pub use router::RouteMatch;
pub use router::Router;
pub use server::Server;
pub use template::Context;
pub use template::TemplateResponse;
