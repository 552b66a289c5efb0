//! Unix-socket [`CommandSource`] implementation.
//!
//! Binds a Unix stream socket and accepts one connection at a time.
//! Each line received is parsed as a JSON-encoded [`Command`]; the
//! [`Response`] is written back as one line of JSON before the next line is
//! read.
//!
//! While a client stays connected, later clients wait in the accept
//! backlog.  A long-lived client such as the OS shim should therefore
//! reconnect per command, or carry every other caller's commands over its
//! own connection.
//!
//! # Wire format
//!
//! ```text
//! > {"KeyDown":{"key_code":16,"modifiers":{"command":true,"shift":true}}}
//! < {"Visibility":{"visible":true}}
//! > {"KeyDown":{"key_code":17,"characters":"t"}}
//! < {"Activate":{"action":{"LaunchApp":{"path":"/System/Applications/Utilities/Terminal.app"}},"visible":false}}
//! > "GetHotkeys"
//! < {"Hotkeys":{"primary":{…},"secondary":null}}
//! ```

use crate::command::{Command, Response};
use crate::traits::{CommandSource, Request};
use log::{debug, error, info};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// A [`CommandSource`] that listens on a Unix stream socket for
/// JSON-encoded commands and answers each one.
///
/// Each accepted connection can send multiple newline-delimited JSON
/// commands.  When the connection closes, the listener waits for the
/// next one.
pub struct UnixSocketListener {
    path: PathBuf,
}

/// Errors produced by the Unix socket listener.
#[derive(Debug, thiserror::Error)]
pub enum UnixSocketError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a connection stopped being served.
enum Disconnect {
    /// The client went away; wait for the next one.
    Client,
    /// The command sink is closed; stop listening.
    SinkClosed,
}

impl UnixSocketListener {
    /// Create a new listener bound to `path`.
    ///
    /// The socket file is created when [`run`](CommandSource::run) is called.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The filesystem path of the socket.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `$XDG_RUNTIME_DIR/smarttab.sock`, or the temp dir if unset.
    pub fn default_path() -> PathBuf {
        dirs::runtime_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("smarttab.sock")
    }

    fn serve(
        &self,
        stream: UnixStream,
        sink: &mpsc::Sender<Request>,
    ) -> Result<Disconnect, UnixSocketError> {
        let mut writer = stream.try_clone()?;
        let reader = BufReader::new(stream);
        for line in reader.lines() {
            let text = line?;
            if text.trim().is_empty() {
                continue;
            }
            let response = match serde_json::from_str::<Command>(&text) {
                Ok(command) => {
                    debug!("received {:?}", command);
                    let (request, rx) = Request::new(command);
                    if sink.send(request).is_err() {
                        return Ok(Disconnect::SinkClosed);
                    }
                    match rx.recv() {
                        Ok(response) => response,
                        Err(_) => return Ok(Disconnect::SinkClosed),
                    }
                }
                Err(e) => {
                    error!("bad command: {} ({})", text, e);
                    Response::Error(format!("bad command: {}", e))
                }
            };
            let mut encoded = serde_json::to_string(&response)?;
            encoded.push('\n');
            writer.write_all(encoded.as_bytes())?;
        }
        Ok(Disconnect::Client)
    }
}

impl CommandSource for UnixSocketListener {
    type Error = UnixSocketError;

    /// Bind the socket and start accepting connections.
    ///
    /// This method **blocks** until the sink is closed.  Run it on a
    /// dedicated thread.
    fn run(&mut self, sink: mpsc::Sender<Request>) -> Result<(), Self::Error> {
        // Remove stale socket if present.
        let _ = std::fs::remove_file(&self.path);

        let listener = UnixListener::bind(&self.path)?;
        info!("listening on {}", self.path.display());

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    debug!("client connected");
                    match self.serve(stream, &sink) {
                        Ok(Disconnect::Client) => debug!("client disconnected"),
                        Ok(Disconnect::SinkClosed) => {
                            info!("sink closed, shutting down");
                            break;
                        }
                        Err(e) => error!("connection error: {}", e),
                    }
                }
                Err(e) => {
                    error!("accept error: {}", e);
                }
            }
        }
        let _ = std::fs::remove_file(&self.path);
        Ok(())
    }
}

//  Tests
