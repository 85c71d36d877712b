//! Carewatch core: the multi-room realtime session orchestrator behind the
//! elder-care monitoring console.
//!
//! The library tracks a server-driven set of active call rooms (snapshot +
//! push events), keeps exactly one realtime session per room with at least
//! one real visitor in it, merges per-room participant state into a single
//! roster, and maps the session pool onto a fixed-size presentation grid.

pub mod api;
pub mod auth;
pub mod config;
pub mod directory;
pub mod error;
pub mod grid;
pub mod models;
pub mod monitor;
pub mod pool;
pub mod roster;

pub use api::{AdminApiClient, RoomsSnapshot, RtcTokenGrant, StreamEvent};
pub use auth::{CredentialProvider, FileTokenStore, StaticTokenStore, TokenStore};
pub use config::{ApiConfig, CarewatchConfig, GridConfig, LoggingConfig};
pub use directory::RoomDirectoryFeed;
pub use error::{CarewatchError, CarewatchResult};
pub use grid::{GridSize, GridSlot, OperatorMediaControls, VideoGrid, MAX_GRID_SIZE, MIN_GRID_SIZE};
pub use models::{
    classify_identity, IdentityClass, OperatorIdentity, ParticipantDescriptor, RoomDescriptor,
    SessionConnection,
};
pub use monitor::{CallMonitor, MonitorStatus};
pub use pool::{ReconcileOutcome, SessionPoolManager};
pub use roster::{AggregatedParticipant, LiveParticipant, RosterAggregator, RosterCallback};
