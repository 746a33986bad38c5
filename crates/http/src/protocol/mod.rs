//! Core gateway protocol types.
//!
//! - **Environment** ([`environ`]): the inbound request description
//!   - [`Environ`]: method, path, query string and headers of one call
//!
//! - **Messages** ([`message`]): what flows back to the client
//!   - [`Message`]: either the response head or a payload chunk
//!   - [`ResponseHead`]: the announced status line and header list
//!
//! - **Error Handling** ([`error`]):
//!   - [`HttpError`]: Top-level error type
//!   - [`ParseError`]: Request parsing errors
//!   - [`SendError`]: Response sending errors

mod environ;
pub use environ::Environ;
pub use environ::EnvironBuilder;

mod message;
pub use message::Message;
pub use message::ResponseHead;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
