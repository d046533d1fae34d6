//! Asynchronous command channel to the adapter. Starts a background thread that owns
//! the transport and performs one blocking exchange at a time; callers queue commands
//! through tokio channels. The queue is the serialization point that keeps the
//! half-duplex adapter honest no matter how many tasks issue commands concurrently.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::error::Error;
use crate::transport::Transport;
use crate::Result;

/// Character the adapter prints when it is ready for the next command.
pub const PROMPT: char = '>';
/// Maximum number of transport reads for a single exchange before giving up.
pub const MAX_READ_ATTEMPTS: usize = 50;
const REQUEST_BUFFER_SIZE: usize = 16;

struct Request {
    command: String,
    reply: oneshot::Sender<Result<String>>,
}

fn process<T: Transport>(
    mut transport: T,
    mut shutdown_receiver: oneshot::Receiver<()>,
    mut request_receiver: mpsc::Receiver<Request>,
) {
    while shutdown_receiver.try_recv().is_err() {
        match request_receiver.try_recv() {
            Ok(request) => {
                let result = exchange(&mut transport, &request.command, &mut shutdown_receiver);
                let closed = matches!(result, Err(Error::ConnectionClosed));
                let _ = request.reply.send(result);
                if closed {
                    break;
                }
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => break,
        }
        std::thread::sleep(std::time::Duration::from_millis(1));
    }
    // Requests still queued are dropped here; their callers see ConnectionClosed.
    // Dropping the transport releases the device handle.
}

/// One write-then-read exchange. Reads until the accumulated text contains the prompt,
/// the transport reports end of stream, or the attempt budget runs out. There is no
/// delay between attempts; the transport's own read timeout is the only pacing.
fn exchange<T: Transport>(
    transport: &mut T,
    command: &str,
    shutdown_receiver: &mut oneshot::Receiver<()>,
) -> Result<String> {
    debug!("TX {}", command);
    transport.write_all(format!("{}\r", command).as_bytes())?;

    let mut response = String::new();
    for _ in 0..MAX_READ_ATTEMPTS {
        if shutdown_receiver.try_recv().is_ok() {
            return Err(Error::ConnectionClosed);
        }

        let chunk = transport.read()?;
        if !chunk.data.is_empty() {
            debug!("RX {}", hex::encode(&chunk.data));
            response.push_str(&String::from_utf8_lossy(&chunk.data));
        }

        if response.contains(PROMPT) || chunk.eof {
            return Ok(clean(&response));
        }
    }

    Err(Error::Timeout)
}

/// Strip every carriage return and every prompt character, then trim. Linefeeds are
/// kept so multi-line responses stay splittable.
fn clean(response: &str) -> String {
    response
        .replace('\r', "")
        .replace(PROMPT, "")
        .trim()
        .to_string()
}

/// Async command channel around a [`Transport`]. Starts a background thread owning the
/// transport and communicates with it over tokio channels; requests are processed
/// strictly in arrival order.
pub struct ElmChannel {
    worker: Mutex<Option<std::thread::JoinHandle<()>>>,
    request_sender: mpsc::Sender<Request>,
    shutdown: Mutex<Option<oneshot::Sender<()>>>,
    connected: AtomicBool,
}

impl ElmChannel {
    pub fn new<T: Transport + Send + 'static>(transport: T) -> Self {
        let (shutdown_sender, shutdown_receiver) = oneshot::channel();
        let (request_sender, request_receiver) = mpsc::channel(REQUEST_BUFFER_SIZE);

        let worker = std::thread::spawn(move || {
            process(transport, shutdown_receiver, request_receiver);
        });

        ElmChannel {
            worker: Mutex::new(Some(worker)),
            request_sender,
            shutdown: Mutex::new(Some(shutdown_sender)),
            connected: AtomicBool::new(true),
        }
    }

    /// Whether the channel still accepts commands.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Queue `command` and wait for the adapter's cleaned response text.
    pub async fn execute(&self, command: &str) -> Result<String> {
        if !self.is_connected() {
            return Err(Error::NotConnected);
        }

        let (reply_sender, reply_receiver) = oneshot::channel();
        let request = Request {
            command: command.to_string(),
            reply: reply_sender,
        };

        self.request_sender
            .send(request)
            .await
            .map_err(|_| Error::ConnectionClosed)?;

        reply_receiver.await.map_err(|_| Error::ConnectionClosed)?
    }

    /// Shut down the worker and release the transport. Idempotent. An in-flight
    /// exchange is rejected with [`Error::ConnectionClosed`] at its next read attempt;
    /// this call blocks briefly while the worker finishes that attempt.
    pub fn close(&self) {
        self.connected.store(false, Ordering::Release);

        if let Some(sender) = self.shutdown.lock().unwrap().take() {
            let _ = sender.send(());
        }

        if let Some(worker) = self.worker.lock().unwrap().take() {
            if worker.join().is_err() {
                warn!("Worker thread panicked during shutdown");
            }
        }
    }
}

impl Drop for ElmChannel {
    fn drop(&mut self) {
        self.close();
    }
}
