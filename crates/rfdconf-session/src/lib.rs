//! Session layer for configuring SiK radios.
//!
//! This crate owns everything between the raw serial byte stream and the
//! typed operations a shell or CLI consumes:
//!
//! - [`Transport`]: the blocking byte-stream seam, with a real
//!   [`SerialTransport`] implementation over the `serialport` crate.
//! - [`ProtocolEngine`]: the command-mode state machine - guard-interval
//!   escape sequence, bounded mode-entry retries, read-until-status command
//!   execution, desync containment.
//! - [`Session`]: the operation set (`get`, `set`, `list_params`, `info`,
//!   `write`, `factory_reset`, `reboot`, `disconnect`) with client-side
//!   validation against the parameter registry.
//!
//! All I/O is synchronous and strictly request/response: the AT protocol
//! has no multiplexing, so there is never more than one command on the
//! wire. A `Session` exclusively owns its transport; two sessions cannot
//! share a port.

mod engine;
mod error;
mod session;
mod transport;

pub use engine::*;
pub use error::*;
pub use session::*;
pub use transport::*;
