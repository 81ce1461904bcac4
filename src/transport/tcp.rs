//! # TCP Transport
//!
//! Accept loop and per-connection driver. Each connection gets its own task
//! and its own framed codec state; nothing is shared between connections
//! except the dispatcher.
//!
//! TLS termination, when deployed, sits in front of these listeners and is
//! outside this crate.

use std::net::SocketAddr;
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_util::codec::Framed;
use tracing::{debug, error, info, instrument, warn};

use crate::core::codec::PacketCodec;
use crate::error::Result;
use crate::protocol::{components, Dispatcher};

/// Start a listener on `addr`, shutting down on CTRL+C.
pub async fn start_server(addr: &str, dispatcher: Arc<Dispatcher>) -> Result<()> {
    // Internal shutdown channel fed by the signal handler.
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);

    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            info!("Received CTRL+C signal, shutting down");
            let _ = shutdown_tx.send(()).await;
        }
    });

    start_server_with_shutdown(addr, dispatcher, shutdown_rx).await
}

/// Start a listener on `addr` with an external shutdown channel.
#[instrument(skip(dispatcher, shutdown_rx))]
pub async fn start_server_with_shutdown(
    addr: &str,
    dispatcher: Arc<Dispatcher>,
    mut shutdown_rx: mpsc::Receiver<()>,
) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => {
                info!("Shutting down listener");
                return Ok(());
            }

            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer)) => {
                        let dispatcher = dispatcher.clone();
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, peer, dispatcher).await {
                                error!(error = %e, %peer, "Connection failed");
                            }
                        });
                    }
                    Err(e) => warn!(error = %e, "Failed to accept connection"),
                }
            }
        }
    }
}

/// Drive one connection: frame inbound bytes into packets, dispatch each,
/// and write back whatever the handler returns.
#[instrument(skip(stream, dispatcher), fields(%peer))]
async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    dispatcher: Arc<Dispatcher>,
) -> Result<()> {
    info!("Accepted connection");
    let mut framed = Framed::new(stream, PacketCodec::new());

    while let Some(packet) = framed.next().await {
        let packet = packet?;
        debug!(descriptor = %components::describe(&packet), "Received packet");
        if let Some(response) = dispatcher.dispatch(&packet)? {
            framed.send(response).await?;
        }
    }

    info!("Connection closed by peer");
    Ok(())
}
