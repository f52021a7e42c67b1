//! Byte destinations for log records.
//!
//! The manager never opens files itself: every stream comes from a
//! [`SinkFactory`], so the same rotation logic drives files on disk and the
//! in-memory buffers used by tests.

use std::{
    collections::HashMap,
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use crate::severity::Severity;

/// Buffer size of file sinks.
const FILE_BUFFER_SIZE: usize = 256 * 1024;

/// An open output stream.
pub trait Sink: Write + Send {
    /// Pushes buffered bytes all the way to durable storage.
    fn sync(&mut self) -> io::Result<()>;
}

/// Opens a stream for a severity under a fresh identity.
pub trait SinkFactory: Send + Sync {
    fn open(&self, severity: Severity, identity: &str) -> io::Result<Box<dyn Sink>>;
}

/// Buffered log files in one directory, named after their identity.
#[derive(Debug, Clone)]
pub struct FileSinks {
    dir: PathBuf,
}

impl FileSinks {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SinkFactory for FileSinks {
    fn open(&self, _severity: Severity, identity: &str) -> io::Result<Box<dyn Sink>> {
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.dir.join(identity))?;
        Ok(Box::new(FileSink(BufWriter::with_capacity(
            FILE_BUFFER_SIZE,
            file,
        ))))
    }
}

struct FileSink(BufWriter<File>);

impl Write for FileSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

impl Sink for FileSink {
    fn sync(&mut self) -> io::Result<()> {
        self.0.flush()?;
        self.0.get_ref().sync_all()
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    // Every stream ever opened, by identity.
    streams: HashMap<String, Vec<u8>>,
    // Identities per severity, oldest first.
    opened: HashMap<Severity, Vec<String>>,
}

/// In-memory sinks whose contents can be inspected after the fact.
///
/// Clones share the same buffers, so a test can keep one handle and give the
/// other to the logger.
#[derive(Debug, Clone, Default)]
pub struct MemorySinks {
    state: Arc<Mutex<MemoryState>>,
}

impl MemorySinks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Identities opened for `severity`, oldest first.
    pub fn identities(&self, severity: Severity) -> Vec<String> {
        self.lock()
            .opened
            .get(&severity)
            .cloned()
            .unwrap_or_default()
    }

    /// Contents of the most recent stream of `severity`.
    pub fn contents(&self, severity: Severity) -> String {
        let state = self.lock();
        state
            .opened
            .get(&severity)
            .and_then(|identities| identities.last())
            .and_then(|identity| state.streams.get(identity))
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .unwrap_or_default()
    }

    /// Contents of every stream of `severity`, in opening order.
    pub fn all_contents(&self, severity: Severity) -> String {
        let state = self.lock();
        state
            .opened
            .get(&severity)
            .into_iter()
            .flatten()
            .filter_map(|identity| state.streams.get(identity))
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .collect()
    }

    /// Contents of each stream of `severity`, one entry per stream, in
    /// opening order.
    pub fn streams(&self, severity: Severity) -> Vec<String> {
        let state = self.lock();
        state
            .opened
            .get(&severity)
            .into_iter()
            .flatten()
            .map(|identity| {
                state
                    .streams
                    .get(identity)
                    .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Forgets every stream.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.streams.clear();
        state.opened.clear();
    }
}

impl SinkFactory for MemorySinks {
    fn open(&self, severity: Severity, identity: &str) -> io::Result<Box<dyn Sink>> {
        let mut state = self.lock();
        state.streams.entry(identity.to_string()).or_default();
        state
            .opened
            .entry(severity)
            .or_default()
            .push(identity.to_string());
        Ok(Box::new(MemorySink {
            sinks: self.clone(),
            identity: identity.to_string(),
        }))
    }
}

struct MemorySink {
    sinks: MemorySinks,
    identity: String,
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.sinks
            .lock()
            .streams
            .entry(self.identity.clone())
            .or_default()
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Sink for MemorySink {
    fn sync(&mut self) -> io::Result<()> {
        Ok(())
    }
}
