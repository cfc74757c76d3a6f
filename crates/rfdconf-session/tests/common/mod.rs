//! Scripted transport double shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rfdconf_session::{EngineConfig, Transport};

/// Shared view of everything a [`MockTransport`] was asked to write.
///
/// The session consumes its transport, so tests keep this handle to inspect
/// traffic after the fact.
#[derive(Clone, Default, Debug)]
pub struct WriteLog(Arc<Mutex<Vec<Vec<u8>>>>);

impl WriteLog {
    /// All writes, in order.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.0.lock().unwrap().clone()
    }

    /// Number of writes exactly equal to `needle`.
    pub fn count_of(&self, needle: &[u8]) -> usize {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|w| w.as_slice() == needle)
            .count()
    }

    /// Whether nothing was written at all.
    pub fn is_empty(&self) -> bool {
        self.0.lock().unwrap().is_empty()
    }

    /// Forget recorded writes (e.g. the mode-entry escape).
    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }

    fn push(&self, data: &[u8]) {
        self.0.lock().unwrap().push(data.to_vec());
    }
}

/// A transport whose reads come from a prepared script.
///
/// Each `read` call delivers the next scripted chunk. A `None` entry in the
/// script reads as `Ok(0)` once (one timed-out read), and an exhausted
/// script reads as `Ok(0)` forever - both shapes a real serial port
/// produces on timeout.
#[derive(Debug)]
pub struct MockTransport {
    reads: VecDeque<Option<Vec<u8>>>,
    log: WriteLog,
    timeouts: TimeoutLog,
}

/// Shared view of every read-timeout change applied to a [`MockTransport`],
/// in order.
#[derive(Clone, Default, Debug)]
pub struct TimeoutLog(Arc<Mutex<Vec<Duration>>>);

impl TimeoutLog {
    /// All timeout changes, oldest first.
    pub fn changes(&self) -> Vec<Duration> {
        self.0.lock().unwrap().clone()
    }
}

impl MockTransport {
    /// Build a transport that will deliver `script` chunks in order.
    pub fn scripted(script: &[&[u8]]) -> (MockTransport, WriteLog) {
        let log = WriteLog::default();
        let transport = MockTransport {
            reads: script.iter().map(|c| Some(c.to_vec())).collect(),
            log: log.clone(),
            timeouts: TimeoutLog::default(),
        };
        (transport, log)
    }

    /// Handle observing read-timeout changes after the transport is moved
    /// into an engine.
    pub fn timeout_log(&self) -> TimeoutLog {
        self.timeouts.clone()
    }

    /// A transport that never produces any bytes.
    pub fn silent() -> (MockTransport, WriteLog) {
        Self::scripted(&[])
    }

    /// Queue another chunk after construction.
    pub fn push_read(&mut self, chunk: &[u8]) {
        self.reads.push_back(Some(chunk.to_vec()));
    }

    /// Queue one timed-out read.
    pub fn push_timeout(&mut self) {
        self.reads.push_back(None);
    }
}

impl Transport for MockTransport {
    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.log.push(data);
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.reads.pop_front() {
            Some(Some(chunk)) => {
                assert!(chunk.len() <= buf.len(), "scripted chunk too large");
                buf[..chunk.len()].copy_from_slice(&chunk);
                Ok(chunk.len())
            }
            Some(None) | None => Ok(0),
        }
    }

    fn set_read_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        self.timeouts.0.lock().unwrap().push(timeout);
        Ok(())
    }

    fn clear_input(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Engine config with all delays zeroed so tests never sleep.
///
/// The read deadline stays generous: scripted reads never block, a
/// zero-byte read already reads as a timeout, and a tight deadline would
/// race the decode of chunks that are sitting right there in the script.
pub fn fast_config() -> EngineConfig {
    EngineConfig {
        guard_time: Duration::ZERO,
        read_timeout: Duration::from_secs(5),
        drain_timeout: Duration::ZERO,
        ..EngineConfig::default()
    }
}
