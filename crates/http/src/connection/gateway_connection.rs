use std::net::SocketAddr;
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use http::StatusCode;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::sync::mpsc::Sender;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{error, info};

use crate::codec::{RequestDecoder, ResponseEncoder};
use crate::handler::{Application, BoxError};
use crate::protocol::{Environ, HttpError, Message, ResponseHead, SendError};

/// How many outbound messages may queue up between the application and the socket
const CHANNEL_CAPACITY: usize = 16;

/// A connection that serves exactly one request.
///
/// `GatewayConnection` reads one request head, hands the [`Environ`] to the
/// [`Application`] on tokio's blocking pool, writes the announced head and the
/// body chunks as they are produced, and then shuts the write side down.
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
pub struct GatewayConnection<R, W> {
    framed_read: FramedRead<R, RequestDecoder>,
    framed_write: FramedWrite<W, ResponseEncoder>,
    remote_addr: Option<SocketAddr>,
}

impl<R, W> GatewayConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            framed_read: FramedRead::with_capacity(reader, RequestDecoder::new(), 8 * 1024),
            framed_write: FramedWrite::new(writer, ResponseEncoder::new()),
            remote_addr: None,
        }
    }

    pub fn with_remote_addr(mut self, remote_addr: SocketAddr) -> Self {
        self.remote_addr = Some(remote_addr);
        self
    }

    pub async fn process<A>(mut self, app: Arc<A>) -> Result<(), HttpError>
    where
        A: Application + 'static,
    {
        let result = match self.framed_read.next().await {
            Some(Ok(mut environ)) => {
                if let Some(remote_addr) = self.remote_addr {
                    environ.set_remote_addr(remote_addr);
                }
                self.do_process(environ, app).await
            }

            Some(Err(e)) => {
                error!("can't receive request, cause {}", e);
                self.send_status(StatusCode::BAD_REQUEST).await?;
                Err(e.into())
            }

            None => {
                info!("cant read request, break this connection down");
                Ok(())
            }
        };

        self.framed_write.get_mut().shutdown().await.map_err(SendError::io)?;
        result
    }

    async fn do_process<A>(&mut self, environ: Environ, app: Arc<A>) -> Result<(), HttpError>
    where
        A: Application + 'static,
    {
        let (sender, mut receiver) = mpsc::channel::<Message>(CHANNEL_CAPACITY);
        let task = tokio::task::spawn_blocking(move || run_application(app.as_ref(), &environ, &sender));

        let mut head_sent = false;
        while let Some(message) = receiver.recv().await {
            head_sent |= message.is_header();
            self.framed_write.send(message).await?;
        }

        match task.await {
            Ok(result) => result.map_err(Into::into),
            Err(e) => {
                error!(cause = %e, "application task failed");
                if !head_sent {
                    self.send_status(StatusCode::INTERNAL_SERVER_ERROR).await?;
                }
                Err(SendError::application(e).into())
            }
        }
    }

    async fn send_status(&mut self, status_code: StatusCode) -> Result<(), HttpError> {
        let reason = status_code.canonical_reason().unwrap_or_default();
        let head = ResponseHead::plain_text(format!("{} {}", status_code.as_str(), reason));

        self.framed_write.feed(Message::Header(head)).await?;
        self.framed_write.send(Message::Payload(reason.into())).await?;
        Ok(())
    }
}

/// Runs the application on the current (blocking) thread and forwards what it produces.
///
/// A closed channel means the connection side has already failed and reported it,
/// so the remaining body is dropped silently.
fn run_application<A: Application>(app: &A, environ: &Environ, sender: &Sender<Message>) -> Result<(), SendError> {
    let mut head = None;
    let result = app.call(environ, &mut |status: &str, headers: &[(String, String)]| {
        head = Some(ResponseHead::new(status, headers.to_vec()));
    });

    let body = match result {
        Ok(body) => body,
        Err(e) => {
            let e: BoxError = e.into();
            error!(cause = %e, "application failed, respond with internal server error");
            send_internal_error(sender);
            return Err(SendError::application(e));
        }
    };

    let Some(head) = head else {
        error!("application returned a body without announcing the status");
        send_internal_error(sender);
        return Err(SendError::application("status was never announced"));
    };

    if sender.blocking_send(Message::Header(head)).is_err() {
        return Ok(());
    }

    for chunk in body {
        match chunk {
            Ok(bytes) => {
                if sender.blocking_send(Message::Payload(bytes)).is_err() {
                    return Ok(());
                }
            }
            Err(e) => {
                let e: BoxError = e.into();
                error!(cause = %e, "application body failed, stop streaming");
                return Err(SendError::body(e));
            }
        }
    }

    Ok(())
}

fn send_internal_error(sender: &Sender<Message>) {
    let status_code = StatusCode::INTERNAL_SERVER_ERROR;
    let reason = status_code.canonical_reason().unwrap_or_default();
    let head = ResponseHead::plain_text(format!("{} {}", status_code.as_str(), reason));

    if sender.blocking_send(Message::Header(head)).is_ok() {
        let _ = sender.blocking_send(Message::Payload(reason.into()));
    }
}
