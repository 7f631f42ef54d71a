//! Test server harness.

use std::net::SocketAddr;
use std::time::Duration;

use congruence::gateway::{HandlerState, create_router_with_state};
use congruence::lifecycle::ModelHandle;
use congruence::scoring::ScoringService;
use congruence::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL_ID, MockLanguageModel};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;

/// Perplexity the default mock assigns to texts mentioning a cat.
pub const COHERENT_PERPLEXITY: f64 = 20.0;
/// Perplexity the default mock assigns to everything else.
pub const INCOHERENT_PERPLEXITY: f64 = 900.0;

#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub port: u16,
    pub handle: ModelHandle,
    pub model_id: String,
    pub max_tokens: usize,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            port: 0,
            handle: ModelHandle::ready(MockLanguageModel::with_perplexity_by_content(
                "gato",
                COHERENT_PERPLEXITY,
                INCOHERENT_PERPLEXITY,
            )),
            model_id: DEFAULT_MODEL_ID.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl TestServerConfig {
    pub fn unloaded() -> Self {
        Self {
            handle: ModelHandle::Unloaded,
            ..Default::default()
        }
    }

    pub fn with_handle(mut self, handle: ModelHandle) -> Self {
        self.handle = handle;
        self
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn find_available_port() -> std::io::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    Ok(addr.port())
}

pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
}

/// Spawns a server on localhost around the configured [`ModelHandle`].
///
/// The default handle is a [`MockLanguageModel`] that rates any text containing "gato" as
/// coherent and everything else as incoherent, so no model files or network are needed.
pub async fn spawn_test_server(config: TestServerConfig) -> Result<TestServer, ServerStartupError> {
    let port = if config.port == 0 {
        find_available_port().await?
    } else {
        config.port
    };

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    let scoring = ScoringService::new(config.handle, config.max_tokens);
    let state = HandlerState::new(scoring, config.model_id.as_str());
    let app = create_router_with_state(state);

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    wait_for_server_ready(
        local_addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(TestServer {
        addr: local_addr,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
    })
}
