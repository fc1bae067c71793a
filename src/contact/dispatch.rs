//! Background delivery so a slow mail service never blocks the UI.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use tracing::warn;

use super::{ContactPayload, Mailer};

/// Runs sends on worker threads and hands results back to the event loop.
pub struct Dispatcher {
    mailer: Arc<dyn Mailer>,
    tx: Sender<Result<(), String>>,
    rx: Receiver<Result<(), String>>,
    in_flight: usize,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("mailer", &self.mailer.describe())
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn new(mailer: Box<dyn Mailer>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            mailer: Arc::from(mailer),
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn describe(&self) -> String {
        self.mailer.describe()
    }

    /// Start delivering `payload` on a worker thread.
    pub fn submit(&mut self, payload: ContactPayload) {
        let mailer = Arc::clone(&self.mailer);
        let tx = self.tx.clone();
        self.in_flight += 1;
        thread::spawn(move || {
            let result = mailer.send(&payload).map_err(|err| {
                warn!(error = %err, "contact message failed");
                err.to_string()
            });
            let _ = tx.send(result);
        });
    }

    /// Take a finished result without blocking.
    pub fn poll(&mut self) -> Option<Result<(), String>> {
        match self.rx.try_recv() {
            Ok(result) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Some(result)
            }
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    pub const fn in_flight(&self) -> usize {
        self.in_flight
    }
}
