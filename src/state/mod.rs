//! Shared application state: the store slot, the connection registry, and the
//! broadcast hub.

pub mod matcher;
pub mod room;
pub mod tiles;
pub mod wire;

use std::sync::Arc;

use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::sync::{RwLock, mpsc, watch};
use uuid::Uuid;

use crate::{config::AppConfig, dao::room_store::RoomStore, error::ServiceError};

pub use self::wire::WireHub;

/// Cheaply clonable handle to the central application state.
pub type SharedState = Arc<AppState>;

#[derive(Clone)]
/// Handle used to push messages to one connected client.
pub struct ClientConnection {
    /// Process-local identifier, used only for registry keys and logs.
    pub id: Uuid,
    /// Writer channel of the connection's socket task.
    pub tx: mpsc::UnboundedSender<Message>,
}

/// Central application state shared by every connection task.
pub struct AppState {
    room_store: RwLock<Option<Arc<dyn RoomStore>>>,
    wire: WireHub,
    connections: DashMap<Uuid, ClientConnection>,
    degraded: watch::Sender<bool>,
    config: AppConfig,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`].
    ///
    /// The application starts in degraded mode until a room store is
    /// installed.
    pub fn new(config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            room_store: RwLock::new(None),
            wire: WireHub::new(config.wire_capacity()),
            connections: DashMap::new(),
            degraded: degraded_tx,
            config,
        })
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Obtain a handle to the current room store, if one is installed.
    pub async fn room_store(&self) -> Option<Arc<dyn RoomStore>> {
        let guard = self.room_store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the room store or fail with [`ServiceError::Degraded`].
    pub async fn require_room_store(&self) -> Result<Arc<dyn RoomStore>, ServiceError> {
        self.room_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a room store implementation and leave degraded mode.
    pub async fn install_room_store(&self, store: Arc<dyn RoomStore>) {
        {
            let mut guard = self.room_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false).await;
    }

    /// Remove the current room store and enter degraded mode.
    pub async fn clear_room_store(&self) {
        {
            let mut guard = self.room_store.write().await;
            guard.take();
        }
        self.update_degraded(true).await;
    }

    /// Current degraded flag.
    pub async fn is_degraded(&self) -> bool {
        let guard = self.room_store.read().await;
        guard.is_none()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Broadcast hub carrying every processed action's payload.
    pub fn wire(&self) -> &WireHub {
        &self.wire
    }

    /// Registry of live client sockets keyed by connection id.
    pub fn connections(&self) -> &DashMap<Uuid, ClientConnection> {
        &self.connections
    }

    /// Update and broadcast the degraded flag when the value changes.
    async fn update_degraded(&self, value: bool) {
        if self.is_degraded().await == value {
            return;
        }

        let _ = self.degraded.send(value);
    }
}
