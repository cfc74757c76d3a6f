//! SiK Radio AT Command Protocol
//!
//! This crate provides types and utilities for talking to SiK-based telemetry
//! radios (RFD900, HM-TRP and friends) over their AT command-mode interface.
//! The radios boot into transparent mode where every serial byte is payload;
//! configuration happens in command mode, a simple line-based text protocol.
//!
//! # Protocol Overview
//!
//! - **Mode entry**: the host sends the escape literal `+++`, framed by a
//!   guard interval of serial silence on both sides, and the radio answers
//!   with `OK` once it is in command mode.
//! - **Commands** (host → radio): ASCII lines terminated with `\r\n`, e.g.
//!   `ATS3?` or `ATS3=25`.
//! - **Responses** (radio → host): zero or more data lines followed by a
//!   terminal status line, exactly `OK` or `ERROR`. The radio also echoes
//!   the command line back.
//!
//! # Command Types
//!
//! - **Register queries**: `ATS<n>?` - read an S-register value
//! - **Register writes**: `ATS<n>=<v>` - stage a new S-register value
//! - **Info pages**: `ATI` .. `ATI7` - version, board identity, stats
//! - **Actions**: `AT&W` (persist to EEPROM), `AT&F` (factory defaults),
//!   `ATZ` (reboot), `ATO` (back to transparent mode)
//!
//! # Example
//!
//! ```rust,ignore
//! use rfdconf_protocol::{Command, LineCodec, ResponseLine};
//!
//! // Build a command
//! let cmd = Command::GetRegister { register: 3 };
//! let bytes = cmd.encode();
//!
//! // Classify a received line
//! let line = ResponseLine::classify("OK");
//! assert!(line.is_terminal());
//! ```
//!
//! This crate is pure: no I/O, no timing. Mode-entry pacing, retries and
//! timeouts belong to the session layer.

mod codec;
mod commands;
mod error;
mod responses;

pub use codec::*;
pub use commands::*;
pub use error::*;
pub use responses::*;
