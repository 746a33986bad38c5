use std::error::Error;
use std::marker::PhantomData;

use crate::request::Request;
use crate::responder::Responder;
use crate::response::Response;
use crate::router::Captures;

/// Error raised by a handler; the dispatcher does not catch it.
pub type HandlerError = Box<dyn Error + Send + Sync>;

/// Handles a matched request.
///
/// Handlers are shared by every concurrent call of the dispatcher, hence `Send + Sync`.
pub trait Handler: Send + Sync {
    fn call(&self, req: &Request<'_>, captures: &Captures) -> Result<Response, HandlerError>;
}

/// a holder which turns any `Fn(&Request, &Captures) -> impl Responder` into a [`Handler`]
pub struct FnHandler<F, R> {
    f: F,
    _phantom: PhantomData<fn() -> R>,
}

impl<F, R> FnHandler<F, R>
where
    F: Fn(&Request<'_>, &Captures) -> R,
{
    fn new(f: F) -> Self {
        Self { f, _phantom: PhantomData }
    }
}

pub fn handler_fn<F, R>(f: F) -> FnHandler<F, R>
where
    F: Fn(&Request<'_>, &Captures) -> R + Send + Sync,
    R: Responder,
{
    FnHandler::new(f)
}

impl<F, R> Handler for FnHandler<F, R>
where
    F: Fn(&Request<'_>, &Captures) -> R + Send + Sync,
    R: Responder,
{
    fn call(&self, req: &Request<'_>, captures: &Captures) -> Result<Response, HandlerError> {
        (self.f)(req, captures).respond()
    }
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    fn call(&self, req: &Request<'_>, captures: &Captures) -> Result<Response, HandlerError> {
        (**self).call(req, captures)
    }
}
