//! Conversion of handler results into responses.
//!
//! Handlers built with [`handler_fn`](crate::handler_fn) may return anything
//! implementing [`Responder`]: a ready [`Response`], plain text, a
//! `(status, responder)` pair, a [`TemplateResponse`](crate::template::TemplateResponse),
//! or a `Result` whose error is handed back to the dispatcher untouched.

use crate::handler::HandlerError;
use crate::response::Response;

pub trait Responder {
    fn respond(self) -> Result<Response, HandlerError>;
}

impl Responder for Response {
    fn respond(self) -> Result<Response, HandlerError> {
        Ok(self)
    }
}

/// The error is propagated, not turned into a response.
impl<T: Responder, E: Into<HandlerError>> Responder for Result<T, E> {
    fn respond(self) -> Result<Response, HandlerError> {
        match self {
            Ok(t) => t.respond(),
            Err(e) => Err(e.into()),
        }
    }
}

/// Overrides the status code of the inner responder.
impl<T: Responder> Responder for (u16, T) {
    fn respond(self) -> Result<Response, HandlerError> {
        let (status, responder) = self;
        let mut response = responder.respond()?;
        response.set_status(status);
        Ok(response)
    }
}

impl Responder for String {
    fn respond(self) -> Result<Response, HandlerError> {
        Ok(Response::new(self))
    }
}

impl Responder for &'static str {
    fn respond(self) -> Result<Response, HandlerError> {
        Ok(Response::new(self))
    }
}

impl Responder for () {
    fn respond(self) -> Result<Response, HandlerError> {
        Ok(Response::new(()))
    }
}
