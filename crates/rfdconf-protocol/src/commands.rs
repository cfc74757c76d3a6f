//! Commands that can be sent to the radio's command-mode interpreter.
//!
//! The AT dialect spoken by SiK firmware is small:
//! - S-register get/set commands for configuration
//! - Info page queries (`ATI` family)
//! - Action commands (persist, factory reset, reboot, exit)

use crate::codec::{LineCodec, MAX_LINE_LENGTH};
use crate::error::{AtError, AtResult};

/// Info pages queryable via the `ATI` command family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoPage {
    /// Firmware version banner (`ATI`)
    Version,
    /// Board type (`ATI2`)
    BoardType,
    /// Board frequency band (`ATI3`)
    BoardFrequency,
    /// Board hardware version (`ATI4`)
    BoardVersion,
    /// TDM timing report (`ATI6`)
    TdmTiming,
    /// RSSI statistics (`ATI7`)
    RssiStats,
}

impl InfoPage {
    /// Get the command string for this info page.
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoPage::Version => "ATI",
            InfoPage::BoardType => "ATI2",
            InfoPage::BoardFrequency => "ATI3",
            InfoPage::BoardVersion => "ATI4",
            InfoPage::TdmTiming => "ATI6",
            InfoPage::RssiStats => "ATI7",
        }
    }
}

/// Commands that can be sent to the radio in command mode.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Probe command (`AT`); the radio answers `OK` when in command mode.
    Attention,

    /// Query an info page (`ATI` family).
    DeviceInfo {
        /// Which page to query.
        page: InfoPage,
    },

    /// Read an S-register value (`ATS<n>?`).
    GetRegister {
        /// S-register index.
        register: u8,
    },

    /// Write an S-register value (`ATS<n>=<v>`).
    ///
    /// The new value takes effect after `WriteEeprom` and a reboot.
    SetRegister {
        /// S-register index.
        register: u8,
        /// Value to stage.
        value: i64,
    },

    /// Persist staged register values to EEPROM (`AT&W`).
    ///
    /// Must be sent before exiting command mode or the staged values are
    /// lost across a reboot.
    WriteEeprom,

    /// Restore all registers to factory defaults (`AT&F`).
    FactoryReset,

    /// Reboot the radio (`ATZ`). The serial link drops immediately.
    Reboot,

    /// Leave command mode and return to transparent mode (`ATO`).
    ExitCommandMode,

    /// Send a raw command string.
    Raw {
        /// The raw command text.
        command: String,
    },
}

impl Command {
    /// Encode the command as a line to send to the radio.
    /// Returns the bytes to send (including the `\r\n` terminator).
    pub fn encode(&self) -> Vec<u8> {
        LineCodec::encode_command(&self.to_command_string())
    }

    /// Check that the command forms a single well-formed line.
    ///
    /// The built-in variants always pass; this guards `Raw` commands from
    /// the shell, which must not smuggle line breaks or overflow the
    /// radio's line buffer.
    pub fn validate(&self) -> AtResult<()> {
        let text = self.to_command_string();
        if text.is_empty() {
            return Err(AtError::InvalidCommand("empty command".to_string()));
        }
        if text.contains('\r') || text.contains('\n') {
            return Err(AtError::InvalidCommand(
                "command contains a line break".to_string(),
            ));
        }
        if text.len() > MAX_LINE_LENGTH {
            return Err(AtError::CommandTooLong {
                max: MAX_LINE_LENGTH,
                actual: text.len(),
            });
        }
        Ok(())
    }

    /// Get the command string without the terminator.
    pub fn to_command_string(&self) -> String {
        match self {
            Command::Attention => "AT".to_string(),
            Command::DeviceInfo { page } => page.as_str().to_string(),
            Command::GetRegister { register } => format!("ATS{}?", register),
            Command::SetRegister { register, value } => {
                format!("ATS{}={}", register, value)
            }
            Command::WriteEeprom => "AT&W".to_string(),
            Command::FactoryReset => "AT&F".to_string(),
            Command::Reboot => "ATZ".to_string(),
            Command::ExitCommandMode => "ATO".to_string(),
            Command::Raw { command } => command.clone(),
        }
    }
}
