use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tonkey_http::connection::GatewayConnection;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use crate::config::{AppRegistry, Config, ConfigError};
use crate::dispatcher::Dispatcher;
use crate::router::Router;

#[derive(Debug)]
pub struct ServerBuilder {
    dispatcher: Option<Dispatcher>,
    address: Option<Vec<SocketAddr>>,
    log_level: Level,
}

impl ServerBuilder {
    fn new() -> Self {
        Self { dispatcher: None, address: None, log_level: Level::INFO }
    }

    /// Sets the listen address; an address that does not resolve is reported by [`build`](Self::build).
    pub fn address<A: ToSocketAddrs>(mut self, address: A) -> Self {
        self.address = match address.to_socket_addrs() {
            Ok(addrs) => Some(addrs.collect()),
            Err(e) => {
                warn!(cause = %e, "can't resolve server address");
                None
            }
        };
        self
    }

    pub fn dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn router(self, router: Router) -> Self {
        self.dispatcher(Dispatcher::new(router))
    }

    pub fn log_level(mut self, log_level: Level) -> Self {
        self.log_level = log_level;
        self
    }

    pub fn build(self) -> Result<Server, ServerBuildError> {
        let dispatcher = self.dispatcher.ok_or(ServerBuildError::MissingDispatcher)?;
        let address = self.address.filter(|address| !address.is_empty()).ok_or(ServerBuildError::MissingAddress)?;
        Ok(Server { dispatcher: Arc::new(dispatcher), address, log_level: self.log_level })
    }
}

#[derive(Debug)]
pub struct Server {
    dispatcher: Arc<Dispatcher>,
    address: Vec<SocketAddr>,
    log_level: Level,
}

#[derive(Error, Debug)]
pub enum ServerBuildError {
    #[error("dispatcher must be set")]
    MissingDispatcher,
    #[error("address must be set")]
    MissingAddress,
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// Builds a server for the application `config` names, listening where it says.
    pub fn from_config(config: &Config, registry: &AppRegistry) -> Result<Server, ServerBuildError> {
        let dispatcher = Dispatcher::from_config(config, registry)?;
        Server::builder().dispatcher(dispatcher).address(config.address()).log_level(config.log_level()).build()
    }

    pub fn address(&self) -> &[SocketAddr] {
        &self.address
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub async fn start(self) {
        let subscriber = FmtSubscriber::builder().with_max_level(self.log_level).finish();
        if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
            warn!(cause = %e, "tracing subscriber already set, keep the existing one");
        }

        info!("start listening at {:?}", self.address);
        let tcp_listener = match TcpListener::bind(self.address.as_slice()).await {
            Ok(tcp_listener) => tcp_listener,
            Err(e) => {
                error!(cause = %e, "bind server error");
                return;
            }
        };

        loop {
            let (tcp_stream, remote_addr) = match tcp_listener.accept().await {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            };

            let dispatcher = Arc::clone(&self.dispatcher);

            tokio::spawn(async move {
                let (reader, writer) = tcp_stream.into_split();
                let connection = GatewayConnection::new(reader, writer).with_remote_addr(remote_addr);
                match connection.process(dispatcher).await {
                    Ok(()) => {
                        info!(%remote_addr, "finished process, connection shutdown");
                    }
                    Err(e) => {
                        error!(%remote_addr, cause = %e, "service has error, connection shutdown");
                    }
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Server, ServerBuildError};
    use crate::config::{AppRegistry, Config, ConfigError};
    use crate::handler::handler_fn;
    use crate::router::Router;
    use tracing::Level;

    fn router() -> Router {
        Router::new().route(r"^/$", handler_fn(|_req, _captures| "home")).unwrap()
    }

    #[test]
    fn test_build() {
        let server = Server::builder().router(router()).address("127.0.0.1:0").build().unwrap();
        assert_eq!(server.address().len(), 1);
        assert_eq!(server.dispatcher().router().len(), 1);
    }

    #[test]
    fn test_build_missing_parts() {
        let result = Server::builder().address("127.0.0.1:0").build();
        assert!(matches!(result, Err(ServerBuildError::MissingDispatcher)));

        let result = Server::builder().router(router()).build();
        assert!(matches!(result, Err(ServerBuildError::MissingAddress)));
    }

    #[test]
    fn test_from_config() {
        let mut registry = AppRegistry::new();
        registry.register("home", || Ok(router()));

        let config = Config::new("home", "127.0.0.1:0".parse().unwrap(), Level::DEBUG);
        let server = Server::from_config(&config, &registry).unwrap();
        assert_eq!(server.address().len(), 1);
        assert_eq!(server.address()[0].port(), 0);

        let config = Config::new("away", "127.0.0.1:0".parse().unwrap(), Level::DEBUG);
        let result = Server::from_config(&config, &registry);
        assert!(matches!(result, Err(ServerBuildError::Config(ConfigError::UnknownApp { .. }))));
    }
}
