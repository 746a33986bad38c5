//! The contract between the gateway and the application it hosts.
//!
//! For every request the gateway calls [`Application::call`] with the
//! [`Environ`] and a [`StartResponse`] callback. The application announces the
//! status line and headers through the callback and returns an iterator of
//! body chunks, which the gateway writes out in order.

use std::error::Error;

use bytes::Bytes;

use crate::protocol::Environ;

pub type BoxError = Box<dyn Error + Send + Sync>;

/// Receives the status line and header list before the body is transmitted.
pub trait StartResponse {
    fn start_response(&mut self, status: &str, headers: &[(String, String)]);
}

impl<F> StartResponse for F
where
    F: FnMut(&str, &[(String, String)]),
{
    fn start_response(&mut self, status: &str, headers: &[(String, String)]) {
        (self)(status, headers);
    }
}

pub trait Application: Send + Sync {
    type Body: Iterator<Item = Result<Bytes, Self::BodyError>> + Send + 'static;
    type BodyError: Into<BoxError>;
    type Error: Into<BoxError>;

    fn call(&self, environ: &Environ, start_response: &mut dyn StartResponse) -> Result<Self::Body, Self::Error>;
}

#[derive(Debug)]
pub struct ApplicationFn<F> {
    f: F,
}

impl<F, B, BodyErr, Err> Application for ApplicationFn<F>
where
    F: Fn(&Environ, &mut dyn StartResponse) -> Result<B, Err> + Send + Sync,
    B: Iterator<Item = Result<Bytes, BodyErr>> + Send + 'static,
    BodyErr: Into<BoxError>,
    Err: Into<BoxError>,
{
    type Body = B;
    type BodyError = BodyErr;
    type Error = Err;

    fn call(&self, environ: &Environ, start_response: &mut dyn StartResponse) -> Result<Self::Body, Self::Error> {
        (self.f)(environ, start_response)
    }
}

pub fn make_application<F, B, BodyErr, Err>(f: F) -> ApplicationFn<F>
where
    F: Fn(&Environ, &mut dyn StartResponse) -> Result<B, Err>,
    B: Iterator<Item = Result<Bytes, BodyErr>>,
{
    ApplicationFn { f }
}

#[cfg(test)]
mod tests {
    use super::{make_application, Application, StartResponse};
    use crate::protocol::Environ;
    use bytes::Bytes;
    use std::convert::Infallible;

    #[test]
    fn test_application_fn_announces_head() {
        let app = make_application(|environ: &Environ, start_response: &mut dyn StartResponse| {
            start_response.start_response("200 OK", &[("content-type".into(), "text/plain".into())]);
            let body = format!("path: {}", environ.path().unwrap_or("/"));
            Ok::<_, Infallible>(std::iter::once(Ok::<_, Infallible>(Bytes::from(body))))
        });

        let mut announced = None;
        let environ = Environ::builder().path("/hello").build();
        let body = app
            .call(&environ, &mut |status: &str, headers: &[(String, String)]| {
                announced = Some((status.to_string(), headers.to_vec()));
            })
            .unwrap();

        let chunks: Vec<Bytes> = body.map(Result::unwrap).collect();
        assert_eq!(chunks, vec![Bytes::from_static(b"path: /hello")]);

        let (status, headers) = announced.unwrap();
        assert_eq!(status, "200 OK");
        assert_eq!(headers, vec![("content-type".to_string(), "text/plain".to_string())]);
    }
}
