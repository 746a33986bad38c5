//! The gateway layer of tonkey
//!
//! This crate is the boundary between a TCP peer and a synchronous web
//! application. It decodes one HTTP/1.x request head into an [`Environ`](protocol::Environ),
//! calls the hosted [`Application`](handler::Application) on tokio's blocking pool,
//! and streams back whatever the application announced and produced.
//!
//! # Example
//!
//! ```no_run
//! use bytes::Bytes;
//! use std::convert::Infallible;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//! use tracing::{error, info, warn};
//! use tonkey_http::connection::GatewayConnection;
//! use tonkey_http::handler::{make_application, StartResponse};
//! use tonkey_http::protocol::Environ;
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = Arc::new(make_application(|environ: &Environ, start_response: &mut dyn StartResponse| {
//!         start_response.start_response("200 OK", &[("content-type".into(), "text/plain".into())]);
//!         let body = format!("hello {}", environ.path().unwrap_or("/"));
//!         Ok::<_, Infallible>(std::iter::once(Ok::<_, Infallible>(Bytes::from(body))))
//!     }));
//!
//!     let tcp_listener = match TcpListener::bind("127.0.0.1:8080").await {
//!         Ok(tcp_listener) => tcp_listener,
//!         Err(e) => {
//!             error!(cause = %e, "bind server error");
//!             return;
//!         }
//!     };
//!
//!     loop {
//!         let (tcp_stream, remote_addr) = match tcp_listener.accept().await {
//!             Ok(stream_and_addr) => stream_and_addr,
//!             Err(e) => {
//!                 warn!(cause = %e, "failed to accept");
//!                 continue;
//!             }
//!         };
//!
//!         let app = app.clone();
//!         tokio::spawn(async move {
//!             let (reader, writer) = tcp_stream.into_split();
//!             let connection = GatewayConnection::new(reader, writer).with_remote_addr(remote_addr);
//!             if let Err(e) = connection.process(app).await {
//!                 error!("service has error, cause {}, connection shutdown", e);
//!             } else {
//!                 info!("finished process, connection shutdown");
//!             }
//!         });
//!     }
//! }
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: environ, response head, messages and errors
//! - [`handler`]: the [`Application`](handler::Application) contract
//! - [`codec`]: request head decoding and response encoding
//! - [`connection`]: the one-request-per-connection driver
//!
//! # Limitations
//!
//! - HTTP/1.0 and HTTP/1.1 only
//! - One request per connection, request bodies are not read
//! - Maximum header size: 8KB
//! - Maximum number of headers: 64

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
