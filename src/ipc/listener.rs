//! Unix-socket [`EventSource`] implementation.
//!
//! Binds a Unix stream socket and accepts one connection at a time.  Each
//! line received is parsed as a JSON-encoded [`InputEvent`].  This is how
//! an input driver or a test script feeds the headless backend.
//!
//! # Wire format
//!
//! Every message is a single line of JSON followed by `\n`:
//!
//! ```json
//! {"MapView":{"output":0,"x":100,"y":100,"width":640,"height":480}}
//! {"Motion":{"x":300,"y":200}}
//! {"Button":{"button":"BTN_LEFT","pressed":true,"modifiers":"SUPER"}}
//! {"Motion":{"x":0,"y":540}}
//! {"Button":{"button":"BTN_LEFT","pressed":false}}
//! {"Frame":{"elapsed_ms":16}}
//! ```

use crate::event::InputEvent;
use crate::traits::EventSource;
use log::{debug, error, info};
use std::io::{BufRead, BufReader};
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// An [`EventSource`] that listens on a Unix stream socket for JSON-encoded
/// input events.
///
/// A connection may send any number of events; when it closes the listener
/// waits for the next one.
pub struct UnixSocketListener {
    path: PathBuf,
}

/// Errors produced by the Unix socket listener.
#[derive(Debug, thiserror::Error)]
pub enum UnixSocketError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl UnixSocketListener {
    /// The socket file is created when [`run`](EventSource::run) is called.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parse one line of the wire format.  Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<InputEvent>, UnixSocketError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(line)?))
}

impl EventSource for UnixSocketListener {
    type Error = UnixSocketError;

    /// Bind the socket and forward events until the sink closes.
    ///
    /// Blocks; run it on a dedicated thread.
    fn run(&mut self, sink: mpsc::Sender<InputEvent>) -> Result<(), Self::Error> {
        // A previous run may have left the socket file behind.
        let _ = std::fs::remove_file(&self.path);

        let listener = UnixListener::bind(&self.path)?;
        info!("listening on {}", self.path.display());

        for stream in listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    error!("accept error: {}", e);
                    continue;
                }
            };
            debug!("client connected");
            for line in BufReader::new(stream).lines() {
                let text = match line {
                    Ok(text) => text,
                    Err(e) => {
                        error!("read error: {}", e);
                        break;
                    }
                };
                match parse_line(&text) {
                    Ok(None) => {}
                    Ok(Some(event)) => {
                        if sink.send(event).is_err() {
                            info!("sink closed, shutting down");
                            return Ok(());
                        }
                    }
                    Err(e) => error!("bad event {:?}: {}", text, e),
                }
            }
            debug!("client disconnected");
        }
        Ok(())
    }
}
