//! Utility functions and helpers
//!
//! Response decoding, vocabulary and time zone handling shared by the
//! query client, plus identity persistence and version information.

pub mod codec;
pub mod identity_store;
pub mod local_time;
pub mod version;
pub mod vocabulary;

pub use identity_store::IdentityStore;
pub use version::{VERSION, get_version};
