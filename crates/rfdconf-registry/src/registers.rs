//! S-register identifiers and their name/index mappings.

/// The S-registers exposed by SiK firmware, in index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SRegister {
    /// EEPROM format version (`S0`)
    Format,
    /// Serial port speed (`S1`)
    SerialSpeed,
    /// Over-the-air data rate (`S2`)
    AirSpeed,
    /// Network ID (`S3`)
    NetId,
    /// Transmit power in dBm (`S4`)
    TxPower,
    /// Error correcting code (`S5`)
    Ecc,
    /// MAVLink framing (`S6`)
    Mavlink,
    /// Opportunistic resend (`S7`)
    OpResend,
    /// Minimum frequency in KHz (`S8`)
    MinFreq,
    /// Maximum frequency in KHz (`S9`)
    MaxFreq,
    /// Number of hopping channels (`S10`)
    NumChannels,
    /// Transmit duty cycle (`S11`)
    DutyCycle,
    /// Listen-before-talk RSSI threshold (`S12`)
    LbtRssi,
    /// Manchester encoding (`S13`)
    Manchester,
    /// RTS/CTS flow control (`S14`)
    RtsCts,
    /// Node ID (`S15`)
    NodeId,
    /// Destination node ID (`S16`)
    NodeDestination,
    /// Send without base node sync (`S17`)
    SyncAny,
    /// Node count (`S18`)
    NodeCount,
}

impl SRegister {
    /// All registers, in index order.
    pub const ALL: [SRegister; 19] = [
        SRegister::Format,
        SRegister::SerialSpeed,
        SRegister::AirSpeed,
        SRegister::NetId,
        SRegister::TxPower,
        SRegister::Ecc,
        SRegister::Mavlink,
        SRegister::OpResend,
        SRegister::MinFreq,
        SRegister::MaxFreq,
        SRegister::NumChannels,
        SRegister::DutyCycle,
        SRegister::LbtRssi,
        SRegister::Manchester,
        SRegister::RtsCts,
        SRegister::NodeId,
        SRegister::NodeDestination,
        SRegister::SyncAny,
        SRegister::NodeCount,
    ];

    /// The numeric register index used on the wire (`ATS<n>?`).
    pub const fn index(self) -> u8 {
        match self {
            SRegister::Format => 0,
            SRegister::SerialSpeed => 1,
            SRegister::AirSpeed => 2,
            SRegister::NetId => 3,
            SRegister::TxPower => 4,
            SRegister::Ecc => 5,
            SRegister::Mavlink => 6,
            SRegister::OpResend => 7,
            SRegister::MinFreq => 8,
            SRegister::MaxFreq => 9,
            SRegister::NumChannels => 10,
            SRegister::DutyCycle => 11,
            SRegister::LbtRssi => 12,
            SRegister::Manchester => 13,
            SRegister::RtsCts => 14,
            SRegister::NodeId => 15,
            SRegister::NodeDestination => 16,
            SRegister::SyncAny => 17,
            SRegister::NodeCount => 18,
        }
    }

    /// The symbolic parameter name.
    pub const fn name(self) -> &'static str {
        match self {
            SRegister::Format => "FORMAT",
            SRegister::SerialSpeed => "SERIAL_SPEED",
            SRegister::AirSpeed => "AIR_SPEED",
            SRegister::NetId => "NETID",
            SRegister::TxPower => "TXPOWER",
            SRegister::Ecc => "ECC",
            SRegister::Mavlink => "MAVLINK",
            SRegister::OpResend => "OP_RESEND",
            SRegister::MinFreq => "MIN_FREQ",
            SRegister::MaxFreq => "MAX_FREQ",
            SRegister::NumChannels => "NUM_CHANNELS",
            SRegister::DutyCycle => "DUTY_CYCLE",
            SRegister::LbtRssi => "LBT_RSSI",
            SRegister::Manchester => "MANCHESTER",
            SRegister::RtsCts => "RTSCTS",
            SRegister::NodeId => "NODEID",
            SRegister::NodeDestination => "NODEDESTINATION",
            SRegister::SyncAny => "SYNCANY",
            SRegister::NodeCount => "NODECOUNT",
        }
    }

    /// Parse a register from its parameter name, case-insensitively.
    pub fn from_name(name: &str) -> Option<SRegister> {
        let upper = name.to_ascii_uppercase();
        SRegister::ALL.iter().copied().find(|r| r.name() == upper)
    }
}

impl std::fmt::Display for SRegister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
