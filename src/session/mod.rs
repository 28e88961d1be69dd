//! Session handling for the EGO mobile backend
//!
//! This module owns everything needed to talk to the backend as the official
//! app would: the spoofed device identity, request construction, the HTTP
//! transport and the handshake window.

pub mod identity;
pub mod manager;
pub mod network;
pub mod request;

pub use identity::DeviceIdentity;
pub use manager::{SessionManager, SessionManagerGeneric, SessionState};
pub use network::{BackendTransport, HttpTransport, ProxySpec};
pub use request::{BackendRequest, Function};
