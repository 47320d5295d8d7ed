//! idleguard-core: session activity tracking and inactivity auto-logout.
//! One controller per guarded navigation context, driven by an injected
//! host environment. No tokio and no IO: every entry point takes `now`.

pub mod activity;
pub mod auth;
pub mod class_status;
pub mod controller;
pub mod coordinator;
pub mod error;
pub mod host;
pub mod incident;
pub mod navigation;
pub mod path_policy;
pub mod policy;
pub mod presenter;
#[cfg(any(test, feature = "sim"))]
pub mod sim;
pub mod timer;
pub mod types;
pub mod verifier;

pub use auth::AuthCollaborator;
pub use controller::{ControllerSnapshot, NavigationOutcome, SessionController};
pub use error::{AuthError, PolicyError, ScheduleError};
pub use host::HostEnvironment;
pub use incident::{Incident, IncidentKind, IncidentLog};
pub use navigation::Navigator;
pub use policy::{SessionConfig, SessionPolicy};
pub use presenter::{PresenterAction, WarningView};
pub use timer::{TimerHandle, TimerKind, TimerToken};
pub use types::{ActivitySignalKind, ActivityState, LogoutReason, PhaseChange, SessionPhase};
