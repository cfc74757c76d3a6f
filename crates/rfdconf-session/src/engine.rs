//! Command-mode protocol engine.
//!
//! The radio's AT dialect has implicit state: after power-up every serial
//! byte is payload (transparent mode), and only after the guarded `+++`
//! escape does the radio interpret lines as commands. This module makes
//! that state explicit and owns all timing policy: guard intervals,
//! read timeouts, mode-entry retries and the desync line bound.

use std::time::{Duration, Instant};

use rfdconf_protocol::{
    Command, CommandReply, LineCodec, ResponseLine, ESCAPE_SEQUENCE, MAX_LINE_LENGTH,
};
use tracing::{debug, trace, warn};

use crate::error::{SessionError, SessionResult};
use crate::transport::Transport;

// ============================================================================
// Configuration
// ============================================================================

/// Timing and retry policy for the protocol engine.
///
/// Every knob is injectable; tests run with zero durations.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Required serial silence before and after the escape sequence.
    pub guard_time: Duration,
    /// Deadline for collecting a command's terminal status.
    pub read_timeout: Duration,
    /// How often the whole escape sequence is attempted before giving up.
    pub mode_entry_attempts: u32,
    /// Decoded lines accepted without a terminal status before the channel
    /// is declared desynchronized.
    pub max_response_lines: usize,
    /// Best-effort drain window after `ATZ`/`ATO`, which may never answer.
    pub drain_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            guard_time: Duration::from_secs(1),
            read_timeout: Duration::from_secs(1),
            mode_entry_attempts: 3,
            max_response_lines: 64,
            drain_timeout: Duration::from_millis(250),
        }
    }
}

// ============================================================================
// Link state
// ============================================================================

/// Where the radio is in its mode lifecycle, as far as this end can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// No usable channel; mode entry failed or the session was torn down.
    Disconnected,
    /// Freshly opened port; the radio forwards serial bytes as payload.
    Transparent,
    /// Escape sequence in flight, prompt not yet seen.
    EnteringCommandMode,
    /// The radio interprets lines as AT commands.
    CommandMode,
}

// ============================================================================
// Read loop outcome (internal)
// ============================================================================

enum ReadFailure {
    /// Deadline expired without a terminal status.
    Timeout,
    /// Data line bound exceeded; channel untrustworthy.
    Desync(usize),
    /// Transport error.
    Io(std::io::Error),
}

// ============================================================================
// Engine
// ============================================================================

/// The command-mode state machine over a [`Transport`].
#[derive(Debug)]
pub struct ProtocolEngine<T: Transport> {
    transport: T,
    codec: LineCodec,
    config: EngineConfig,
    state: LinkState,
}

impl<T: Transport> ProtocolEngine<T> {
    /// Wrap a freshly opened transport. The radio is assumed to be in
    /// transparent mode, as it is after power-up.
    pub fn new(transport: T, config: EngineConfig) -> Self {
        ProtocolEngine {
            transport,
            codec: LineCodec::new(),
            config,
            state: LinkState::Transparent,
        }
    }

    /// Current link state.
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// The engine's timing policy.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Release the underlying transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    // ========================================================================
    // Mode entry
    // ========================================================================

    /// Switch the radio into command mode.
    ///
    /// Sends the guarded `+++` escape and waits for the `OK` prompt. Each
    /// failed attempt restarts the entire sequence, fresh guard intervals
    /// included; a retry never resends partial bytes. Exhausting the
    /// configured attempts leaves the link `Disconnected`.
    pub fn enter_command_mode(&mut self) -> SessionResult<()> {
        let attempts = self.config.mode_entry_attempts;
        for attempt in 1..=attempts {
            debug!("mode entry attempt {}/{}", attempt, attempts);
            self.state = LinkState::EnteringCommandMode;
            self.codec.clear();
            if let Err(e) = self.try_escape() {
                self.state = LinkState::Disconnected;
                return Err(SessionError::Transport(e));
            }

            match self.read_reply(None) {
                Ok(reply) if reply.ok => {
                    debug!("command mode entered");
                    self.state = LinkState::CommandMode;
                    return Ok(());
                }
                Ok(reply) => {
                    warn!(
                        "escape answered with ERROR ({:?}), retrying",
                        reply.text()
                    );
                }
                Err(ReadFailure::Timeout) => {
                    debug!("no prompt within timeout");
                }
                Err(ReadFailure::Desync(lines)) => {
                    warn!("garbage during mode entry ({} lines), retrying", lines);
                }
                Err(ReadFailure::Io(e)) => {
                    self.state = LinkState::Disconnected;
                    return Err(SessionError::Transport(e));
                }
            }
        }

        self.state = LinkState::Disconnected;
        Err(SessionError::ModeEntryFailed { attempts })
    }

    /// One guarded escape transmission: silence, `+++`, silence.
    fn try_escape(&mut self) -> std::io::Result<()> {
        self.transport.clear_input()?;
        std::thread::sleep(self.config.guard_time);
        self.transport.write_all(ESCAPE_SEQUENCE)?;
        std::thread::sleep(self.config.guard_time);
        Ok(())
    }

    // ========================================================================
    // Command execution
    // ========================================================================

    /// Send one command and collect its reply.
    ///
    /// Reads decoded lines until a terminal `OK`/`ERROR`: the command echo
    /// and blank lines are discarded, everything else accumulates as the
    /// data payload. `ERROR` surfaces as [`SessionError::CommandRejected`]
    /// with the data lines as context. Exceeding the data line bound means
    /// message boundaries can no longer be trusted: the engine resets to
    /// `Disconnected` rather than keep guessing.
    pub fn execute(&mut self, cmd: &Command) -> SessionResult<CommandReply> {
        if self.state != LinkState::CommandMode {
            return Err(SessionError::NotConnected);
        }
        cmd.validate()?;

        let cmd_str = cmd.to_command_string();
        trace!("sending '{}'", cmd_str);
        self.transport.write_all(&cmd.encode())?;

        match self.read_reply(Some(&cmd_str)) {
            Ok(reply) if reply.ok => Ok(reply),
            Ok(reply) => Err(SessionError::CommandRejected {
                command: cmd_str,
                response: reply.text(),
            }),
            Err(ReadFailure::Timeout) => {
                Err(SessionError::CommandTimeout { command: cmd_str })
            }
            Err(ReadFailure::Desync(lines)) => {
                warn!("desync while executing '{}', resetting link", cmd_str);
                self.state = LinkState::Disconnected;
                self.codec.clear();
                Err(SessionError::ProtocolDesync { lines })
            }
            Err(ReadFailure::Io(e)) => Err(SessionError::Transport(e)),
        }
    }

    /// Leave command mode (`ATO`), returning the radio to transparent mode.
    ///
    /// The radio may or may not acknowledge; the reply is drained
    /// best-effort only.
    pub fn exit_command_mode(&mut self) -> SessionResult<()> {
        self.send_and_drain(&Command::ExitCommandMode)
    }

    /// Reboot the radio (`ATZ`). The link drops immediately, so no
    /// acknowledgement is expected.
    pub fn reboot(&mut self) -> SessionResult<()> {
        self.send_and_drain(&Command::Reboot)
    }

    fn send_and_drain(&mut self, cmd: &Command) -> SessionResult<()> {
        if self.state != LinkState::CommandMode {
            return Err(SessionError::NotConnected);
        }
        trace!("sending '{}' (no reply expected)", cmd.to_command_string());
        self.transport.write_all(&cmd.encode())?;

        // Whatever comes back (echo, OK, boot banner) is stale the moment
        // the mode changes; swallow it within the drain window.
        let _ = self.transport.set_read_timeout(self.config.drain_timeout);
        let deadline = Instant::now() + self.config.drain_timeout;
        let mut buf = [0u8; 256];
        loop {
            match self.transport.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(_) if Instant::now() >= deadline => break,
                Ok(_) => continue,
            }
        }
        // Undo the drain window so a transport recovered through
        // `into_transport` keeps its configured timeout.
        let _ = self.transport.set_read_timeout(self.config.read_timeout);

        self.codec.clear();
        self.state = LinkState::Disconnected;
        Ok(())
    }

    // ========================================================================
    // Read loop
    // ========================================================================

    /// Collect lines until a terminal status, the read deadline, or the
    /// desync bound. `echo` is the command line whose first echoed copy
    /// should be dropped.
    ///
    /// Every exit path is bounded, even against a channel that streams
    /// bytes forever. Terminated noise hits the line bound, unterminated
    /// noise hits the line length cap on the buffer, and anything slower
    /// runs into the deadline.
    fn read_reply(&mut self, echo: Option<&str>) -> Result<CommandReply, ReadFailure> {
        let deadline = Instant::now() + self.config.read_timeout;
        let mut expect_echo = echo;
        let mut data: Vec<String> = Vec::new();
        let mut lines = 0usize;
        let mut buf = [0u8; 256];

        loop {
            while let Some(line) = self.codec.decode_line() {
                lines += 1;
                if lines > self.config.max_response_lines {
                    return Err(ReadFailure::Desync(lines));
                }
                if line.is_empty() {
                    continue;
                }
                if expect_echo == Some(line.as_str()) {
                    trace!("dropping echo");
                    expect_echo = None;
                    continue;
                }
                match ResponseLine::classify(&line) {
                    ResponseLine::Ok => {
                        return Ok(CommandReply { data, ok: true });
                    }
                    ResponseLine::Error => {
                        return Ok(CommandReply { data, ok: false });
                    }
                    ResponseLine::Data(text) => data.push(text),
                }
            }

            // Complete lines are all drained, so whatever is buffered is one
            // partial line. Past the protocol's line length it will never
            // terminate: that is transparent-mode payload, not a reply.
            if self.codec.buffered_len() > MAX_LINE_LENGTH {
                return Err(ReadFailure::Desync(lines + 1));
            }
            if Instant::now() >= deadline {
                return Err(ReadFailure::Timeout);
            }

            let n = self.transport.read(&mut buf).map_err(ReadFailure::Io)?;
            if n == 0 {
                // A zero-byte read is the transport's own read timeout
                // elapsing with nothing received.
                return Err(ReadFailure::Timeout);
            }
            self.codec.push(&buf[..n]);
        }
    }
}
