//! Session controller: the typed operation set consumed by the shell/CLI.
//!
//! A [`Session`] composes the protocol engine with the parameter registry.
//! Every operation validates client-side before anything touches the wire,
//! and every outcome is a typed value or a typed error; callers never have
//! to parse protocol text.

use std::collections::BTreeSet;

use rfdconf_protocol::{Command, CommandReply, InfoPage};
use rfdconf_registry as registry;
use tracing::{debug, warn};

use crate::engine::{EngineConfig, LinkState, ProtocolEngine};
use crate::error::{SessionError, SessionResult};
use crate::transport::Transport;

// ============================================================================
// Result types
// ============================================================================

/// One parameter's current value as read from the radio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamValue {
    /// Parameter name.
    pub name: &'static str,
    /// Value reported by the radio.
    pub value: i64,
}

/// Result of a full parameter sweep.
///
/// A sweep issues one query per registry entry in display order. If a query
/// fails mid-sequence the values collected so far are kept and the first
/// error is reported alongside them.
#[derive(Debug)]
pub struct ParamListing {
    /// Values collected, in registry display order.
    pub values: Vec<ParamValue>,
    /// The parameter that failed and why, if the sweep was cut short.
    pub failed: Option<(&'static str, SessionError)>,
}

impl ParamListing {
    /// Whether every parameter was read.
    pub fn is_complete(&self) -> bool {
        self.failed.is_none()
    }
}

/// Board identity and configuration snapshot from `info()`.
#[derive(Debug)]
pub struct ModemInfo {
    /// Firmware version banner (`ATI`).
    pub version: String,
    /// Board type (`ATI2`).
    pub board_type: String,
    /// Board frequency band (`ATI3`).
    pub board_frequency: String,
    /// Board hardware version (`ATI4`).
    pub board_version: String,
    /// TDM timing report lines (`ATI6`), as the radio prints them.
    pub tdm_timing: Vec<String>,
    /// RSSI statistics lines (`ATI7`), as the radio prints them.
    pub rssi_stats: Vec<String>,
    /// All parameter values.
    pub params: ParamListing,
    /// Parameters set since the last `write()`, not yet persisted.
    pub pending_writes: Vec<&'static str>,
}

// ============================================================================
// Session
// ============================================================================

/// A configuration session against one radio.
///
/// The session exclusively owns its transport; it is created in command
/// mode by [`Session::connect`] and releases the transport on
/// [`Session::disconnect`] or drop.
#[derive(Debug)]
pub struct Session<T: Transport> {
    engine: ProtocolEngine<T>,
    /// Names set since the last `write()`. Advisory only: each `set` is on
    /// the radio already, this just tracks what a reboot would lose.
    pending_writes: BTreeSet<&'static str>,
}

impl<T: Transport> Session<T> {
    /// Open a session: wrap the transport and enter command mode.
    ///
    /// On mode-entry failure the error is returned and the transport is
    /// dropped with it; the caller reconnects with a fresh transport.
    pub fn connect(transport: T, config: EngineConfig) -> SessionResult<Session<T>> {
        let mut engine = ProtocolEngine::new(transport, config);
        engine.enter_command_mode()?;
        Ok(Session {
            engine,
            pending_writes: BTreeSet::new(),
        })
    }

    /// Current link state.
    pub fn state(&self) -> LinkState {
        self.engine.state()
    }

    /// Parameters set since the last `write()`, in name order.
    pub fn pending_writes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.pending_writes.iter().copied()
    }

    // ========================================================================
    // Parameter operations
    // ========================================================================

    /// Read one parameter's current value.
    pub fn get(&mut self, name: &str) -> SessionResult<i64> {
        let def = registry::lookup(name)
            .ok_or_else(|| SessionError::UnknownParameter(name.to_string()))?;

        let cmd = Command::GetRegister {
            register: def.register.index(),
        };
        let reply = self.execute_with_retry(&cmd)?;
        reply.value().ok_or_else(|| SessionError::UnexpectedResponse {
            command: cmd.to_command_string(),
            response: reply.text(),
        })
    }

    /// Stage a new value for one parameter.
    ///
    /// Validated against the registry before any bytes are sent; the radio's
    /// own range check (an `ERROR` reply) remains as a second line of
    /// defense. The new value is on the radio immediately but survives a
    /// reboot only after [`Session::write`].
    pub fn set(&mut self, name: &str, value: i64) -> SessionResult<()> {
        let def = registry::validate(name, value)?;

        let cmd = Command::SetRegister {
            register: def.register.index(),
            value,
        };
        self.execute_with_retry(&cmd)?;
        self.pending_writes.insert(def.name());
        debug!("{} staged to {}", def.name(), value);
        Ok(())
    }

    /// Read every parameter in the registry, in display order.
    ///
    /// One query per parameter; a failure stops the sweep and is reported
    /// together with the values already collected.
    pub fn list_params(&mut self) -> ParamListing {
        let mut values = Vec::with_capacity(registry::DEFINITIONS.len());
        for def in registry::iter() {
            match self.get(def.name()) {
                Ok(value) => values.push(ParamValue {
                    name: def.name(),
                    value,
                }),
                Err(err) => {
                    warn!("parameter sweep stopped at {}: {}", def.name(), err);
                    return ParamListing {
                        values,
                        failed: Some((def.name(), err)),
                    };
                }
            }
        }
        ParamListing {
            values,
            failed: None,
        }
    }

    /// Board identity, link statistics and a full parameter sweep.
    pub fn info(&mut self) -> SessionResult<ModemInfo> {
        let version = self.info_page(InfoPage::Version)?;
        let board_type = self.info_page(InfoPage::BoardType)?;
        let board_frequency = self.info_page(InfoPage::BoardFrequency)?;
        let board_version = self.info_page(InfoPage::BoardVersion)?;
        let tdm_timing = self.info_lines(InfoPage::TdmTiming)?;
        let rssi_stats = self.info_lines(InfoPage::RssiStats)?;
        let params = self.list_params();
        Ok(ModemInfo {
            version,
            board_type,
            board_frequency,
            board_version,
            tdm_timing,
            rssi_stats,
            params,
            pending_writes: self.pending_writes.iter().copied().collect(),
        })
    }

    fn info_page(&mut self, page: InfoPage) -> SessionResult<String> {
        let reply = self.execute_with_retry(&Command::DeviceInfo { page })?;
        Ok(reply.text())
    }

    /// Multi-line info pages keep their line structure.
    fn info_lines(&mut self, page: InfoPage) -> SessionResult<Vec<String>> {
        let reply = self.execute_with_retry(&Command::DeviceInfo { page })?;
        Ok(reply.data)
    }

    // ========================================================================
    // Persistence and teardown
    // ========================================================================

    /// Persist staged values to EEPROM (`AT&W`).
    ///
    /// Required before exiting or rebooting, or staged values are lost.
    /// Idempotent on the radio side: writing an unchanged configuration is
    /// a no-op.
    pub fn write(&mut self) -> SessionResult<()> {
        self.execute_with_retry(&Command::WriteEeprom)?;
        self.pending_writes.clear();
        Ok(())
    }

    /// Restore factory defaults and persist them (`AT&F` + `AT&W`), so a
    /// subsequent `get` reflects the defaults even across a reboot.
    pub fn factory_reset(&mut self) -> SessionResult<()> {
        self.execute_with_retry(&Command::FactoryReset)?;
        self.execute_with_retry(&Command::WriteEeprom)?;
        self.pending_writes.clear();
        Ok(())
    }

    /// Reboot the radio. Best-effort: the link drops immediately, so no
    /// acknowledgement is collected and no failure is reported beyond
    /// transport errors. The session ends `Disconnected`.
    pub fn reboot(&mut self) -> SessionResult<()> {
        if self.engine.state() != LinkState::CommandMode {
            return Ok(());
        }
        self.engine.reboot()
    }

    /// Leave command mode and end the session. Idempotent: calling it on a
    /// disconnected session is a no-op.
    pub fn disconnect(&mut self) -> SessionResult<()> {
        if self.engine.state() != LinkState::CommandMode {
            return Ok(());
        }
        self.engine.exit_command_mode()
    }

    /// Tear down and release the underlying transport.
    pub fn into_transport(mut self) -> T {
        let _ = self.disconnect();
        self.engine.into_transport()
    }

    /// Send a raw AT command and return its data lines, for commands the
    /// typed surface does not cover.
    pub fn raw(&mut self, command: &str) -> SessionResult<CommandReply> {
        self.execute_with_retry(&Command::Raw {
            command: command.to_string(),
        })
    }

    // ========================================================================
    // Retry policy
    // ========================================================================

    /// Execute with one silent retry on timeout.
    ///
    /// Only `CommandTimeout` is retried: a rejection is deterministic and a
    /// desync means the channel itself is gone.
    fn execute_with_retry(&mut self, cmd: &Command) -> SessionResult<CommandReply> {
        match self.engine.execute(cmd) {
            Err(SessionError::CommandTimeout { command }) => {
                warn!("'{}' timed out, retrying once", command);
                self.engine.execute(cmd)
            }
            other => other,
        }
    }
}
