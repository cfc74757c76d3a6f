//! SiK Radio Configuration CLI
//!
//! Command-line tool for configuring RFD900-family telemetry radios over
//! their serial AT command interface.
//!
//! # Usage
//!
//! ```bash
//! # Read one parameter (port auto-detected if unique)
//! rfdconf get NETID
//!
//! # Stage a value and persist it
//! rfdconf --port /dev/ttyUSB0 set NETID 25
//! rfdconf --port /dev/ttyUSB0 write
//!
//! # Show board identity and all parameters
//! rfdconf info
//!
//! # Interactive shell
//! rfdconf shell
//! ```

mod shell;

use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use rfdconf_session::{
    available_ports, EngineConfig, SerialConfig, SerialTransport, Session, SessionError,
};

/// SiK radio modem configuration tool
#[derive(Parser, Debug)]
#[command(name = "rfdconf")]
#[command(about = "Configure RFD900/SiK radio modems over a serial link")]
#[command(version)]
struct Args {
    /// Serial port of the radio (auto-detected when omitted)
    #[arg(short, long)]
    port: Option<String>,

    /// Baud rate
    #[arg(short, long, default_value = "57600")]
    baud: u32,

    /// Read timeout in seconds
    #[arg(short, long, default_value = "1.0")]
    timeout: f64,

    /// Enable verbose logging (protocol behavior is unaffected)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read one parameter value
    Get {
        /// Parameter name (e.g. NETID)
        name: String,
    },

    /// Set one parameter value (remember to `write` afterwards)
    Set {
        /// Parameter name (e.g. NETID)
        name: String,
        /// New value
        value: i64,
    },

    /// List all parameters and their current values
    Params,

    /// Show board identity and all parameters
    Info,

    /// Persist staged values to EEPROM
    Write,

    /// Restore factory defaults (and persist them)
    FactoryReset,

    /// Reboot the radio
    Reboot,

    /// List detected serial ports
    Ports,

    /// Interactive configuration shell
    Shell,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            if matches!(e, SessionError::ProtocolDesync { .. }) {
                eprintln!("the serial channel is out of sync; reconnect and retry");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), SessionError> {
    // `ports` needs no session at all.
    if let Commands::Ports = args.command {
        return print_ports();
    }

    let port = match &args.port {
        Some(p) => p.clone(),
        None => autodetect_port()?,
    };

    let serial = SerialConfig {
        baud_rate: args.baud,
        read_timeout: parse_timeout(args.timeout)?,
    };
    let engine = EngineConfig {
        read_timeout: serial.read_timeout,
        ..EngineConfig::default()
    };

    info!("connecting to {} at {} baud", port, serial.baud_rate);
    let transport = SerialTransport::open(&port, &serial)?;
    let mut session = Session::connect(transport, engine)?;

    let result = dispatch(&mut session, &args.command);
    let _ = session.disconnect();
    result
}

fn dispatch(
    session: &mut Session<SerialTransport>,
    command: &Commands,
) -> Result<(), SessionError> {
    match command {
        Commands::Get { name } => {
            let def = rfdconf_registry::lookup(name)
                .ok_or_else(|| SessionError::UnknownParameter(name.clone()))?;
            let value = session.get(name)?;
            println!("{} = {}", def.name(), value);
            println!("  {}", def.description);
            println!("  valid range: {} to {}, default {}", def.min, def.max, def.default);
            if def.requires_matching {
                println!("  note: must be set to the same value on both radios");
            }
            Ok(())
        }
        Commands::Set { name, value } => {
            session.set(name, *value)?;
            println!("{} set to {} (not yet persisted; run `write`)", name, value);
            if let Some(def) = rfdconf_registry::lookup(name) {
                if def.requires_matching {
                    println!("note: must be set to the same value on both radios");
                }
            }
            Ok(())
        }
        Commands::Params => print_listing(session.list_params()),
        Commands::Info => {
            let info = session.info()?;
            println!("Version:         {}", info.version);
            println!("Board type:      {}", info.board_type);
            println!("Board frequency: {}", info.board_frequency);
            println!("Board version:   {}", info.board_version);
            for line in &info.tdm_timing {
                println!("Timing:          {}", line);
            }
            for line in &info.rssi_stats {
                println!("Signal:          {}", line);
            }
            if !info.pending_writes.is_empty() {
                println!("Unsaved changes: {}", info.pending_writes.join(", "));
            }
            println!();
            print_listing(info.params)
        }
        Commands::Write => {
            session.write()?;
            println!("configuration written to EEPROM");
            Ok(())
        }
        Commands::FactoryReset => {
            session.factory_reset()?;
            println!("reset to factory defaults");
            Ok(())
        }
        Commands::Reboot => {
            session.reboot()?;
            println!("radio rebooted");
            Ok(())
        }
        Commands::Shell => shell::run(session),
        Commands::Ports => unreachable!("handled before connecting"),
    }
}

/// Print a parameter sweep. A partial sweep still prints what it got
/// before surfacing the error that cut it short.
fn print_listing(listing: rfdconf_session::ParamListing) -> Result<(), SessionError> {
    for pv in &listing.values {
        let matching = rfdconf_registry::lookup(pv.name)
            .filter(|d| d.requires_matching)
            .map(|_| " [match]")
            .unwrap_or("");
        println!("{:<16} {:>8}{}", pv.name, pv.value, matching);
    }
    match listing.failed {
        None => Ok(()),
        Some((name, err)) => {
            eprintln!("(sweep stopped at {})", name);
            Err(err)
        }
    }
}

/// Parse the `--timeout` seconds value. `Duration::from_secs_f64` panics
/// on negative or non-finite input, so those become a usage error instead.
fn parse_timeout(seconds: f64) -> Result<Duration, SessionError> {
    Duration::try_from_secs_f64(seconds).map_err(|_| {
        SessionError::Transport(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!(
                "invalid timeout {}: must be a non-negative number of seconds",
                seconds
            ),
        ))
    })
}

fn autodetect_port() -> Result<String, SessionError> {
    let ports = available_ports()?;
    match ports.len() {
        0 => Err(SessionError::Transport(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no serial ports detected; pass --port explicitly",
        ))),
        1 => {
            debug!("auto-detected serial port {}", ports[0].name);
            Ok(ports[0].name.clone())
        }
        _ => {
            let names: Vec<_> = ports.iter().map(|p| p.name.as_str()).collect();
            Err(SessionError::Transport(std::io::Error::other(format!(
                "multiple serial ports detected ({}); pass --port explicitly",
                names.join(", ")
            ))))
        }
    }
}

fn print_ports() -> Result<(), SessionError> {
    let ports = available_ports()?;
    if ports.is_empty() {
        println!("no serial ports detected");
        return Ok(());
    }
    for port in ports {
        match port.description {
            Some(desc) => println!("{}  ({})", port.name, desc),
            None => println!("{}", port.name),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timeout_accepts_fractional_seconds() {
        assert_eq!(parse_timeout(1.5).unwrap(), Duration::from_millis(1500));
        assert_eq!(parse_timeout(0.0).unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_parse_timeout_rejects_negative_and_non_finite() {
        assert!(parse_timeout(-1.0).is_err());
        assert!(parse_timeout(f64::NAN).is_err());
        assert!(parse_timeout(f64::INFINITY).is_err());
    }
}
