//! `Dashboard` port implementation backed by an axum server.

use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{Instrument, Span};

use pironman_app::ports::{ConfigListener, Dashboard};
use pironman_domain::config::ConfigDocument;
use pironman_domain::device::DeviceInfo;
use pironman_domain::error::PironmanError;
use pironman_domain::log_level::LogLevel;
use pironman_domain::status::Status;

use crate::error::HttpError;
use crate::router;
use crate::state::DashboardState;

/// How long `stop` waits for open connections (SSE clients) before aborting.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Everything the dashboard needs at construction time.
#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub device: DeviceInfo,
    /// Name of the history database, shown to the user.
    pub database: String,
    pub spc_enabled: bool,
    pub config: ConfigDocument,
    /// `host:port` to listen on.
    pub bind_addr: String,
}

struct Server {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<io::Result<()>>,
    local_addr: SocketAddr,
}

/// Web dashboard serving status and config over HTTP.
pub struct HttpDashboard {
    state: DashboardState,
    bind_addr: String,
    span: Span,
    level: Mutex<LogLevel>,
    server: tokio::sync::Mutex<Option<Server>>,
}

impl HttpDashboard {
    #[must_use]
    pub fn new(settings: DashboardSettings, span: Span) -> Self {
        let DashboardSettings {
            device,
            database,
            spc_enabled,
            config,
            bind_addr,
        } = settings;
        Self {
            state: DashboardState::new(device, database, spc_enabled, config),
            bind_addr,
            span,
            level: Mutex::new(LogLevel::Info),
            server: tokio::sync::Mutex::new(None),
        }
    }

    /// The router served by [`start`](Dashboard::start), sharing this
    /// dashboard's state.
    #[must_use]
    pub fn router(&self) -> axum::Router {
        router::build(self.state.clone())
    }

    #[must_use]
    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Address the server is bound to, once started.
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.server.lock().await.as_ref().map(|s| s.local_addr)
    }

    /// Level last set through [`set_debug_level`](Dashboard::set_debug_level).
    #[must_use]
    pub fn debug_level(&self) -> LogLevel {
        *self.level.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Dashboard for HttpDashboard {
    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    async fn start(&self) -> Result<(), PironmanError> {
        let mut server = self.server.lock().await;
        if server.is_some() {
            tracing::debug!(parent: &self.span, "dashboard already running");
            return Ok(());
        }

        let bind_err = |source| HttpError::Bind {
            addr: self.bind_addr.clone(),
            source,
        };
        let listener = TcpListener::bind(&self.bind_addr).await.map_err(bind_err)?;
        let local_addr = listener.local_addr().map_err(bind_err)?;

        let (shutdown, shutdown_rx) = oneshot::channel::<()>();
        let app = router::build(self.state.clone());
        let task = tokio::spawn(
            async move {
                axum::serve(listener, app)
                    .with_graceful_shutdown(async move {
                        let _ = shutdown_rx.await;
                    })
                    .await
            }
            .instrument(self.span.clone()),
        );

        tracing::info!(parent: &self.span, %local_addr, "dashboard listening");
        *server = Some(Server {
            shutdown,
            task,
            local_addr,
        });
        Ok(())
    }

    async fn stop(&self) -> Result<(), PironmanError> {
        let Some(server) = self.server.lock().await.take() else {
            return Ok(());
        };
        let _ = server.shutdown.send(());

        let mut task = server.task;
        match tokio::time::timeout(SHUTDOWN_GRACE, &mut task).await {
            Ok(joined) => joined.map_err(HttpError::Join)?.map_err(HttpError::Serve)?,
            Err(_) => {
                tracing::warn!(parent: &self.span, "connections still open, aborting server");
                task.abort();
            }
        }

        tracing::info!(parent: &self.span, "dashboard stopped");
        Ok(())
    }

    fn set_debug_level(&self, level: LogLevel) {
        *self.level.lock().unwrap_or_else(PoisonError::into_inner) = level;
        tracing::debug!(parent: &self.span, %level, "dashboard debug level set");
    }

    fn update_status(&self, status: &Status) {
        self.state.publish_status(status.clone());
    }

    fn update_config(&self, config: &ConfigDocument) {
        self.state.set_config(config.clone());
    }

    fn set_on_config_changed(&self, listener: Arc<dyn ConfigListener>) {
        self.state.set_listener(listener);
    }
}
