//! Core traits that decouple smarttab from any specific storage backend or
//! transport mechanism.
//!
//! The [`Launcher`](crate::launcher::Launcher) and
//! [`ConfigManager`](crate::manager::ConfigManager) only depend on these
//! abstractions.

use crate::command::{Command, Response};
use crate::store::StoreError;
use serde_json::Value;
use std::sync::mpsc;

//  Preference Store

/// A persistent key-value store of JSON values.
///
/// Implementations might write a JSON file, talk to a platform preferences
/// database, or keep everything in memory for tests.
pub trait PreferenceStore {
    /// Value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError>;
}

//  Command Source

/// A command together with the channel its [`Response`] goes back on.
#[derive(Debug)]
pub struct Request {
    pub command: Command,
    pub reply: mpsc::Sender<Response>,
}

impl Request {
    /// Wrap `command`, returning the request and the receiver its answer
    /// will arrive on.
    pub fn new(command: Command) -> (Self, mpsc::Receiver<Response>) {
        let (reply, rx) = mpsc::channel();
        (Self { command, reply }, rx)
    }
}

/// A source of [`Command`]s.
///
/// Implementations listen on some transport (a Unix socket, an in-memory
/// channel, …) and forward parsed commands into the provided
/// [`mpsc::Sender`] as [`Request`]s.
///
/// # Contract
///
/// * [`run`](CommandSource::run) **blocks** until the source is exhausted or
///   an unrecoverable error occurs.
/// * Each received command must be sent through `sink` exactly once.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait CommandSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every incoming [`Command`] into `sink`.
    ///
    /// This method blocks the calling thread.
    fn run(&mut self, sink: mpsc::Sender<Request>) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    //  Mock CommandSource

    #[derive(Debug, thiserror::Error)]
    #[error("mock error")]
    struct MockError;

    /// A test double that emits a fixed sequence of commands and collects
    /// the answers.
    struct MockSource {
        commands: Vec<Command>,
        answers: Vec<Response>,
    }

    impl CommandSource for MockSource {
        type Error = MockError;

        fn run(&mut self, sink: mpsc::Sender<Request>) -> Result<(), MockError> {
            for cmd in self.commands.drain(..) {
                let (req, rx) = Request::new(cmd);
                sink.send(req).map_err(|_| MockError)?;
                self.answers.push(rx.recv().map_err(|_| MockError)?);
            }
            Ok(())
        }
    }

    #[test]
    fn mock_source_round_trips_requests() {
        let mut src = MockSource {
            commands: vec![Command::Toggle, Command::Status],
            answers: Vec::new(),
        };
        let (tx, rx) = mpsc::channel::<Request>();

        let responder = std::thread::spawn(move || {
            let mut visible = false;
            for req in rx {
                if req.command == Command::Toggle {
                    visible = !visible;
                }
                let _ = req.reply.send(Response::Visibility { visible });
            }
        });

        src.run(tx).unwrap();
        responder.join().unwrap();

        assert_eq!(
            src.answers,
            vec![
                Response::Visibility { visible: true },
                Response::Visibility { visible: true },
            ]
        );
    }
}
