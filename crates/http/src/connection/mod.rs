//! Connection handling module
//!
//! - [`GatewayConnection`]: serves a single request on a byte stream:
//!   - Decodes the request head into an environ
//!   - Runs the application on the blocking pool
//!   - Streams the announced head and the body chunks back
//!   - Shuts the connection down afterwards (no keep-alive)

mod gateway_connection;

pub use gateway_connection::GatewayConnection;
