use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::Router;
use hyper::server::conn::Http;
use rustls::ServerConfig;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio_rustls::TlsAcceptor;
use tracing::{debug, error, info, warn};

use crate::api::routes;
use crate::api::types::ApiState;
use crate::config::Config;
use crate::error::Error;

/// HTTP(S) server for the ACME API
pub struct ApiServer {
    /// Listening address
    address: SocketAddr,
    /// Router
    router: Router,
    /// TLS settings; plain HTTP when absent
    tls: Option<Arc<ServerConfig>>,
}

impl ApiServer {
    /// Create a server for `state` on the configured listen address
    pub fn new(
        config: &Config,
        state: ApiState,
        tls: Option<Arc<ServerConfig>>,
    ) -> Result<Self, Error> {
        let address = config.listen_address()?;
        let router = routes::create_router(state);

        Ok(Self::with_router(address, router, tls))
    }

    /// Create a server with a custom router
    pub fn with_router(address: SocketAddr, router: Router, tls: Option<Arc<ServerConfig>>) -> Self {
        Self {
            address,
            router,
            tls,
        }
    }

    /// Serve until Ctrl+C or SIGTERM
    pub async fn start_with_shutdown(self) -> Result<(), Error> {
        self.run_until(Self::shutdown_signal()).await
    }

    /// Serve until `shutdown` completes
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match self.tls.clone() {
            Some(tls) => self.serve_tls(tls, shutdown).await,
            None => self.serve_plain(shutdown).await,
        }
    }

    async fn serve_plain<F>(self, shutdown: F) -> Result<(), Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Starting API server on http://{}", self.address);

        let server = axum::Server::try_bind(&self.address)
            .map_err(|e| Error::Config(format!("Failed to bind {}: {}", self.address, e)))?
            .serve(self.router.into_make_service())
            .with_graceful_shutdown(shutdown);

        if let Err(e) = server.await {
            error!("API server error: {}", e);
            return Err(Error::Internal(format!("API server error: {}", e)));
        }

        info!("API server shut down gracefully");
        Ok(())
    }

    /// Accept TLS connections until `shutdown`, then let every open
    /// connection finish its in-flight request before returning
    async fn serve_tls<F>(self, tls: Arc<ServerConfig>, shutdown: F) -> Result<(), Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.address).await?;
        let acceptor = TlsAcceptor::from(tls);
        info!("Starting API server on https://{}", self.address);

        let (stop_tx, stop_rx) = watch::channel(false);
        let mut connections = JoinSet::new();

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                Some(_) = connections.join_next(), if !connections.is_empty() => {}
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            error!("Failed to accept connection: {}", e);
                            continue;
                        }
                    };
                    debug!("New connection from {}", peer);

                    let acceptor = acceptor.clone();
                    let router = self.router.clone();
                    let mut stop_rx = stop_rx.clone();
                    connections.spawn(async move {
                        let tls_stream = tokio::select! {
                            accepted = acceptor.accept(stream) => match accepted {
                                Ok(s) => s,
                                Err(e) => {
                                    warn!("TLS handshake with {} failed: {}", peer, e);
                                    return;
                                }
                            },
                            _ = stop_rx.changed() => return,
                        };

                        let conn = Http::new().serve_connection(tls_stream, router);
                        tokio::pin!(conn);
                        let result = tokio::select! {
                            result = conn.as_mut() => result,
                            _ = stop_rx.changed() => {
                                conn.as_mut().graceful_shutdown();
                                conn.as_mut().await
                            }
                        };
                        if let Err(e) = result {
                            debug!("Connection from {} closed with error: {}", peer, e);
                        }
                    });
                }
            }
        }

        drop(listener);
        let _ = stop_tx.send(true);
        debug!("Draining {} open connections", connections.len());
        while connections.join_next().await.is_some() {}

        info!("API server shut down gracefully");
        Ok(())
    }

    /// Wait for Ctrl+C or SIGTERM
    async fn shutdown_signal() {
        let ctrl_c = async {
            match signal::ctrl_c().await {
                Ok(()) => debug!("Received Ctrl+C signal"),
                Err(e) => {
                    error!("Failed to listen for Ctrl+C: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                    debug!("Received SIGTERM signal");
                }
                Err(e) => {
                    error!("Failed to install SIGTERM handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }

        info!("Shutdown signal received, starting graceful shutdown");
    }

    pub fn address(&self) -> &SocketAddr {
        &self.address
    }

    pub fn is_tls(&self) -> bool {
        self.tls.is_some()
    }
}
