//! Interactive configuration shell.
//!
//! A thin line-reading loop over the session operations. All protocol and
//! validation behavior lives in the session crate; this module only parses
//! command words and formats output.

use std::io::{self, BufRead, Write};

use rfdconf_session::{SerialTransport, Session, SessionError};

const HELP: &str = "\
Available commands:
    get <PARAM>          read a parameter (e.g. get NETID)
    set <PARAM> <VALUE>  stage a parameter value (e.g. set NETID 25)
    params               list all parameters
    info                 show board identity and parameters
    write                persist staged values to EEPROM
    raw <COMMAND>        send a raw AT command
    help                 show this help
    exit / quit          leave command mode and exit";

/// Run the shell until `exit`, `quit` or end of input.
pub fn run(session: &mut Session<SerialTransport>) -> Result<(), SessionError> {
    println!("Entering interactive shell. Type 'help' for a list of commands.");
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("rfdconf> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut words = line.split_whitespace();
        let verb = words.next().unwrap_or_default().to_ascii_lowercase();
        match verb.as_str() {
            "exit" | "quit" => break,
            "help" => println!("{}", HELP),
            "get" => match words.next() {
                Some(name) => report(get(session, name)),
                None => println!("usage: get <PARAM>"),
            },
            "set" => match (words.next(), words.next()) {
                (Some(name), Some(value)) => match value.parse::<i64>() {
                    Ok(value) => report(set(session, name, value)),
                    Err(_) => println!("value must be an integer"),
                },
                _ => println!("usage: set <PARAM> <VALUE>"),
            },
            "params" => report(params(session)),
            "info" => report(info(session)),
            "write" => report(write(session)),
            "raw" => {
                let rest = line[3..].trim();
                if rest.is_empty() {
                    println!("usage: raw <COMMAND>");
                } else {
                    report(raw(session, rest));
                }
            }
            other => println!("unknown command '{}'; type 'help'", other),
        }

        // A desync ends the session; nothing else will work until reconnect.
        if session.state() != rfdconf_session::LinkState::CommandMode {
            println!("session lost; reconnect to continue");
            break;
        }
    }

    Ok(())
}

/// Print a command failure without leaving the shell; only transport-level
/// errors propagate.
fn report(result: Result<(), SessionError>) {
    if let Err(e) = result {
        println!("error: {}", e);
    }
}

fn get(session: &mut Session<SerialTransport>, name: &str) -> Result<(), SessionError> {
    let value = session.get(name)?;
    println!("{} = {}", name.to_ascii_uppercase(), value);
    Ok(())
}

fn set(
    session: &mut Session<SerialTransport>,
    name: &str,
    value: i64,
) -> Result<(), SessionError> {
    session.set(name, value)?;
    println!("{} set to {} (run 'write' to persist)", name.to_ascii_uppercase(), value);
    Ok(())
}

fn params(session: &mut Session<SerialTransport>) -> Result<(), SessionError> {
    let listing = session.list_params();
    for pv in &listing.values {
        println!("{:<16} {:>8}", pv.name, pv.value);
    }
    match listing.failed {
        None => Ok(()),
        Some((_, err)) => Err(err),
    }
}

fn info(session: &mut Session<SerialTransport>) -> Result<(), SessionError> {
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
    for pv in &info.params.values {
        println!("{:<16} {:>8}", pv.name, pv.value);
    }
    match info.params.failed {
        None => Ok(()),
        Some((_, err)) => Err(err),
    }
}

fn write(session: &mut Session<SerialTransport>) -> Result<(), SessionError> {
    session.write()?;
    println!("saved");
    Ok(())
}

fn raw(session: &mut Session<SerialTransport>, command: &str) -> Result<(), SessionError> {
    let reply = session.raw(command)?;
    let text = reply.text();
    if !text.is_empty() {
        println!("{}", text);
    }
    println!("OK");
    Ok(())
}
