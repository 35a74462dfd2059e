//! Background writer for file and stderr targets.

use crate::error::Result;
use crate::log_message::LogMessage;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::mpsc::Receiver;

/// Owns the output stream on the writer thread.
pub(crate) struct LogWriter {
    sink: Box<dyn Write + Send>,
}

impl LogWriter {
    /// Opens or creates the file in append mode.
    pub fn to_file(log_path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;
        Ok(Self {
            sink: Box::new(file),
        })
    }

    pub fn to_stderr() -> Self {
        Self {
            sink: Box::new(io::stderr()),
        }
    }

    /// Writes and flushes a message. Failures are reported on stderr and dropped.
    fn write_message(&mut self, message: &LogMessage) {
        if let Err(e) = self.sink.write_all(message.format().as_bytes()) {
            eprintln!("Error writing log: {}", e);
            return;
        }
        if let Err(e) = self.sink.flush() {
            eprintln!("Error flushing log: {}", e);
        }
    }

    /// Runs until every sender is dropped.
    pub fn run(mut self, receiver: Receiver<LogMessage>) {
        for message in receiver {
            self.write_message(&message);
        }
    }
}

/// Moves `writer` onto a dedicated thread.
pub(crate) fn spawn_writer_thread(writer: LogWriter, receiver: Receiver<LogMessage>) {
    std::thread::spawn(move || writer.run(receiver));
}
