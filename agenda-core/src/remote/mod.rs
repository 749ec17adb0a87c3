//! External calendar and holiday providers, reached as subprocesses.

pub mod protocol;
pub mod provider;

pub use protocol::SyncResponse;
pub use provider::Provider;
