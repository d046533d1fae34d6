#![allow(dead_code)]
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use scantool::transport::{Chunk, Transport};
use scantool::Error;

/// Largest chunk a single mock read returns, so replies arrive in pieces like they
/// do from a real serial port.
pub const CHUNK_SIZE: usize = 8;

/// Shared knobs and observations for a [`MockElm`]. Tests keep a handle to this
/// while the transport itself lives on the channel's worker thread.
#[derive(Default)]
pub struct MockState {
    /// Every command written to the adapter, terminator stripped, in order.
    pub commands: Vec<String>,
    /// Writes of this command fail with an I/O error until the field is cleared.
    pub fail_command: Option<String>,
    /// This command gets no reply at all; reads behave like serial timeouts.
    pub stall_command: Option<String>,
    /// Reply `NO DATA` to every data request.
    pub no_data: bool,
    /// Prefix every data reply with a `SEARCHING...` line.
    pub banner: bool,
}

/// Scripted ELM327 on the bench: replies to the setup commands and a fixed set of
/// mode 01 requests with canned frames, `\r`-terminated and prompt-suffixed like
/// the real device.
pub struct MockElm {
    state: Arc<Mutex<MockState>>,
    pending: VecDeque<u8>,
    stalled: bool,
}

impl MockElm {
    pub fn new() -> MockElm {
        MockElm {
            state: Arc::new(Mutex::new(MockState::default())),
            pending: VecDeque::new(),
            stalled: false,
        }
    }

    pub fn state(&self) -> Arc<Mutex<MockState>> {
        self.state.clone()
    }
}

fn reply_for(state: &MockState, command: &str) -> String {
    if command == "ATZ" {
        return "\r\rELM327 v1.5\r\r>".into();
    }
    if command.starts_with("AT") {
        return "OK\r\r>".into();
    }

    let reply = if state.no_data {
        "NO DATA\r\r>".into()
    } else {
        match command {
            "010C" => "410C1AF8\r\r>".into(),
            "010D" => "410D41\r\r>".into(),
            "0105" => "410573\r\r>".into(),
            "010F" => "410F46\r\r>".into(),
            "0110" => "41100208\r\r>".into(),
            "0111" => "41117F\r\r>".into(),
            "0902" => "49020131473159593236\r49020255303735313233\r490203343536\r\r>".into(),
            _ => "?\r\r>".into(),
        }
    };

    if state.banner {
        format!("SEARCHING...\r\n{}", reply)
    } else {
        reply
    }
}

impl Transport for MockElm {
    fn write_all(&mut self, data: &[u8]) -> Result<(), Error> {
        let text = String::from_utf8_lossy(data);
        let command = text.trim_end_matches('\r').to_string();

        let mut state = self.state.lock().unwrap();
        state.commands.push(command.clone());

        if state.fail_command.as_deref() == Some(command.as_str()) {
            let fault = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "injected fault");
            return Err(fault.into());
        }

        self.stalled = state.stall_command.as_deref() == Some(command.as_str());
        if !self.stalled {
            self.pending.extend(reply_for(&state, &command).into_bytes());
        }

        Ok(())
    }

    fn read(&mut self) -> Result<Chunk, Error> {
        if self.stalled || self.pending.is_empty() {
            // Nothing buffered behaves like a serial read timeout.
            std::thread::sleep(Duration::from_millis(1));
            return Ok(Chunk::default());
        }

        let take = self.pending.len().min(CHUNK_SIZE);
        Ok(Chunk {
            data: self.pending.drain(..take).collect(),
            eof: false,
        })
    }
}
