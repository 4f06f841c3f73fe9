//! Listener lifecycle: open the store, serve, drain on SIGINT/SIGTERM.

use crate::config::ServerConfig;
use crate::routes::app_router;
use crate::state::AppState;
use crate::store::SqliteConfigStore;
use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinError;

/// How long in-flight requests may run after a shutdown signal.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(20);

/// Open the database named in `config`, bind, and serve until a termination signal.
pub async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let store = SqliteConfigStore::open(&config.data_path).await?;
    let state = AppState::new(Arc::new(store.clone()));
    let listener = TcpListener::bind(config.bind_address()).await?;

    let served = serve(listener, state, shutdown_signal()).await;
    store.close().await;
    served?;
    Ok(())
}

/// Serve until `signal` resolves, then allow [`SHUTDOWN_GRACE`] for open requests before
/// aborting the server task.
pub async fn serve<S>(listener: TcpListener, state: AppState, signal: S) -> io::Result<()>
where
    S: Future<Output = ()> + Send,
{
    serve_with_grace(listener, state, signal, SHUTDOWN_GRACE).await
}

/// [`serve`] with a custom drain window.
pub async fn serve_with_grace<S>(listener: TcpListener, state: AppState, signal: S, grace: Duration) -> io::Result<()>
where
    S: Future<Output = ()> + Send,
{
    let address = listener.local_addr()?;
    let drain = Arc::new(Notify::new());
    let server = axum::serve(listener, app_router(state)).with_graceful_shutdown({
        let drain = drain.clone();
        async move { drain.notified().await }
    });

    tracing::info!(%address, "starting the server");
    let mut task = tokio::spawn(async move { server.await });

    tokio::select! {
        joined = &mut task => return flatten(joined),
        () = signal => {}
    }

    tracing::info!("stopping the server");
    drain.notify_one();
    match tokio::time::timeout(grace, &mut task).await {
        Ok(joined) => flatten(joined),
        Err(_) => {
            tracing::warn!(grace_ms = grace.as_millis() as u64, "requests still running, forcing shutdown");
            task.abort();
            Ok(())
        }
    }
}

fn flatten(joined: Result<io::Result<()>, JoinError>) -> io::Result<()> {
    joined.map_err(io::Error::other)?
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
