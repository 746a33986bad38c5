use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tonkey_web::config::AppRegistry;
use tonkey_web::router::{RouteError, Router};
use tonkey_web::{handler_fn, Captures, Config, Context, Request, Response, Server, TemplateResponse};

static VISITS: AtomicU64 = AtomicU64::new(0);

#[derive(Serialize)]
struct Greeting<'a> {
    name: &'a str,
    visits: u64,
}

fn index(_req: &Request<'_>, _captures: &Captures) -> &'static str {
    "<p>try <a href=\"/greet/world\">/greet/world</a> or <a href=\"/hello?name=you\">/hello?name=you</a></p>"
}

// curl -v http://127.0.0.1:8080/greet/world
fn greet(_req: &Request<'_>, captures: &Captures) -> Result<TemplateResponse, tonkey_web::HandlerError> {
    let greeting = Greeting { name: captures.get(0).unwrap_or("world"), visits: VISITS.fetch_add(1, Ordering::Relaxed) + 1 };
    let template = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("examples/templates/greet.html");
    Ok(TemplateResponse::new(template, Context::from_serialize(&greeting)?))
}

// curl -v "http://127.0.0.1:8080/hello?name=you"
fn hello(req: &Request<'_>, _captures: &Captures) -> Response {
    let name = req.query().get("name").unwrap_or("stranger");
    Response::builder().content_type(mime::TEXT_PLAIN).body(format!("hello {name}\n")).build()
}

fn greeter() -> Result<Router, RouteError> {
    Router::new().route(r"^/$", handler_fn(index))?.route(r"^/greet/(\w+)$", handler_fn(greet))?.route(r"^/hello", handler_fn(hello))
}

// TONKEY_APP=greeter cargo run --example greeter
#[tokio::main]
async fn main() {
    let mut registry = AppRegistry::new();
    registry.register("greeter", greeter);

    let server = Config::from_env()
        .map_err(Into::into)
        .and_then(|config| Server::from_config(&config, &registry));

    match server {
        Ok(server) => server.start().await,
        Err(e) => eprintln!("can't start server: {e}"),
    }
}
