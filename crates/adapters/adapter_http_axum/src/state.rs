//! Shared state for axum handlers.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::broadcast;

use pironman_app::ports::ConfigListener;
use pironman_domain::config::ConfigDocument;
use pironman_domain::device::DeviceInfo;
use pironman_domain::status::Status;

const STATUS_CHANNEL_CAPACITY: usize = 64;

/// Dashboard state shared across all axum handlers.
///
/// Cheap to clone: every clone points at the same inner state.
#[derive(Clone)]
pub struct DashboardState {
    inner: Arc<Shared>,
}

struct Shared {
    device: DeviceInfo,
    database: String,
    spc_enabled: bool,
    config: RwLock<ConfigDocument>,
    status: RwLock<Option<Status>>,
    listener: RwLock<Option<Arc<dyn ConfigListener>>>,
    status_tx: broadcast::Sender<Status>,
}

impl DashboardState {
    #[must_use]
    pub fn new(
        device: DeviceInfo,
        database: impl Into<String>,
        spc_enabled: bool,
        config: ConfigDocument,
    ) -> Self {
        let (status_tx, _) = broadcast::channel(STATUS_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Shared {
                device,
                database: database.into(),
                spc_enabled,
                config: RwLock::new(config),
                status: RwLock::new(None),
                listener: RwLock::new(None),
                status_tx,
            }),
        }
    }

    #[must_use]
    pub fn device(&self) -> &DeviceInfo {
        &self.inner.device
    }

    #[must_use]
    pub fn database(&self) -> &str {
        &self.inner.database
    }

    #[must_use]
    pub fn spc_enabled(&self) -> bool {
        self.inner.spc_enabled
    }

    #[must_use]
    pub fn config(&self) -> ConfigDocument {
        read(&self.inner.config).clone()
    }

    pub fn set_config(&self, config: ConfigDocument) {
        *write(&self.inner.config) = config;
    }

    #[must_use]
    pub fn status(&self) -> Option<Status> {
        read(&self.inner.status).clone()
    }

    /// Store `status` as the latest snapshot and broadcast it to SSE
    /// subscribers. Publishing without subscribers is fine.
    pub fn publish_status(&self, status: Status) {
        *write(&self.inner.status) = Some(status.clone());
        let _ = self.inner.status_tx.send(status);
    }

    /// Receive every snapshot published *after* this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Status> {
        self.inner.status_tx.subscribe()
    }

    #[must_use]
    pub fn listener(&self) -> Option<Arc<dyn ConfigListener>> {
        read(&self.inner.listener).clone()
    }

    pub fn set_listener(&self, listener: Arc<dyn ConfigListener>) {
        *write(&self.inner.listener) = Some(listener);
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
