//! The logging facade.
//!
//! A call flows through the verbosity gate (leveled calls only), the
//! redaction engine, header formatting and truncation, and finally the sink
//! manager, which fans the record out to every lower severity.
//!
//! ```text
//! I0102 15:04:05.067890    1234 handler.rs:42] payload
//! ^^^^^ ^^^^^^^^^^^^^^^ ^^^^^^^ ^^^^^^^^^^^^^
//! sev   time (micros)   pid     call site
//! ```

use std::{
    backtrace::Backtrace,
    borrow::Cow,
    fmt,
    io::{self, Write as _},
    panic::Location,
    path::Path,
    sync::{
        atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering},
        mpsc, Arc, PoisonError, RwLock, Weak,
    },
    thread,
    time::Duration,
};

use chrono::{DateTime, Local};

use crate::{
    clock::{Clock, SystemClock},
    config::LoggerConfig,
    error::{ConfigError, SinkError},
    manager::{stderr_observer, ErrorObserver, SinkManager},
    redaction::{redact_with_limit, Redact},
    rotation::RotationPolicy,
    severity::Severity,
    sink::{FileSinks, SinkFactory},
    verbosity::{short_file_name, Level, VerbosityGate},
};

/// Marker appended to truncated lines.
pub const TRUNCATION_MARKER: &str = "...";

/// Runs after a FATAL record has been written and flushed.
pub type FatalAction = Arc<dyn Fn() + Send + Sync>;

/// Renders the stack of the calling thread.
pub trait StackCapture: Send + Sync {
    fn capture(&self) -> String;
}

/// Captures with [`std::backtrace::Backtrace`], regardless of
/// `RUST_BACKTRACE`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BacktraceCapture;

impl StackCapture for BacktraceCapture {
    fn capture(&self) -> String {
        Backtrace::force_capture().to_string()
    }
}

/// A call site whose records get a stack trace attached.
#[derive(Clone, Debug, PartialEq, Eq)]
struct TraceLocation {
    file: String,
    line: u32,
}

impl TraceLocation {
    fn parse(spec: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::TraceLocation(spec.to_string());
        let (file, line) = spec.rsplit_once(':').ok_or_else(invalid)?;
        let line: u32 = line.parse().map_err(|_| invalid())?;
        if file.is_empty() || line == 0 {
            return Err(invalid());
        }
        Ok(Self {
            file: base_name(file).to_string(),
            line,
        })
    }
}

/// The file name of `path`, extension included.
fn base_name(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
}

/// Formats the fixed-width record header.
pub fn format_header(
    severity: Severity,
    now: DateTime<Local>,
    pid: u32,
    file: &str,
    line: u32,
) -> String {
    format!(
        "{}{} {pid:>7} {file}:{line}] ",
        severity.letter(),
        now.format("%m%d %H:%M:%S%.6f"),
    )
}

/// Cuts `line` to at most `max` characters, the last of which spell
/// [`TRUNCATION_MARKER`]. A negative `max` disables truncation.
pub fn truncate(line: &str, max: i64) -> Cow<'_, str> {
    let Ok(max) = usize::try_from(max) else {
        return Cow::Borrowed(line);
    };
    if line.chars().count() <= max {
        return Cow::Borrowed(line);
    }
    let marker_len = TRUNCATION_MARKER.len().min(max);
    let mut out: String = line.chars().take(max - marker_len).collect();
    out.push_str(&TRUNCATION_MARKER[..marker_len]);
    Cow::Owned(out)
}

/// A leveled logger.
pub struct Logger {
    sinks: SinkManager,
    verbosity: VerbosityGate,
    clock: Arc<dyn Clock>,
    pid: u32,
    depth_limit: usize,
    max_message_len: AtomicI64,
    trace_location: RwLock<Option<TraceLocation>>,
    stack_capture: Arc<dyn StackCapture>,
    also_to_stderr: AtomicBool,
    stderr_threshold: AtomicUsize,
    on_fatal: FatalAction,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("pid", &self.pid)
            .field("verbosity", &self.verbosity)
            .field("max_message_len", &self.max_message_len)
            .finish_non_exhaustive()
    }
}

impl Logger {
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// Builds a logger writing files as described by `config`.
    pub fn new(config: LoggerConfig) -> Result<Self, ConfigError> {
        LoggerBuilder::default().config(config).build()
    }

    #[track_caller]
    pub fn info<T: Redact + ?Sized>(&self, payload: &T) {
        self.log_caller(Severity::Info, payload);
    }

    #[track_caller]
    pub fn warning<T: Redact + ?Sized>(&self, payload: &T) {
        self.log_caller(Severity::Warning, payload);
    }

    #[track_caller]
    pub fn error<T: Redact + ?Sized>(&self, payload: &T) {
        self.log_caller(Severity::Error, payload);
    }

    /// Logs at FATAL, flushes every sink and runs the terminal action.
    #[track_caller]
    pub fn fatal<T: Redact + ?Sized>(&self, payload: &T) {
        self.log_caller(Severity::Fatal, payload);
    }

    /// Gate for a leveled call from the caller's file.
    #[track_caller]
    pub fn v(&self, level: Level) -> Verbose<'_> {
        let file = Location::caller().file();
        let enabled = self.verbosity.enabled(level, short_file_name(file));
        Verbose {
            logger: enabled.then_some(self),
        }
    }

    #[track_caller]
    fn log_caller<T: Redact + ?Sized>(&self, severity: Severity, payload: &T) {
        let caller = Location::caller();
        self.log_at(severity, caller.file(), caller.line(), payload);
    }

    /// Logs `payload` as if called from `file:line`.
    pub fn log_at<T: Redact + ?Sized>(
        &self,
        severity: Severity,
        file: &str,
        line: u32,
        payload: &T,
    ) {
        let text = redact_with_limit(payload, None, self.depth_limit);
        self.output(severity, file, line, &text);
    }

    fn output(&self, severity: Severity, file: &str, line: u32, text: &str) {
        let file = base_name(file);
        let mut record = format_header(severity, self.clock.now(), self.pid, file, line);
        record.push_str(text);
        let mut record =
            truncate(&record, self.max_message_len.load(Ordering::Relaxed)).into_owned();
        record.push('\n');

        if self.traced(file, line) || severity == Severity::Fatal {
            let trace = self.stack_capture.capture();
            record.push_str(&trace);
            if !trace.ends_with('\n') {
                record.push('\n');
            }
        }

        if self.also_to_stderr.load(Ordering::Relaxed) || severity >= self.stderr_threshold() {
            let _ = io::stderr().write_all(record.as_bytes());
        }
        self.sinks.write(severity, record.as_bytes());

        if severity == Severity::Fatal {
            self.sinks.flush();
            (self.on_fatal)();
        }
    }

    fn traced(&self, file: &str, line: u32) -> bool {
        self.trace_location
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|trace| trace.line == line && trace.file == file)
    }

    /// The verbosity table consulted by [`Logger::v`].
    pub fn verbosity(&self) -> &VerbosityGate {
        &self.verbosity
    }

    pub fn set_verbosity(&self, level: Level) {
        self.verbosity.set_global(level);
    }

    /// Replaces the per-file overrides; see [`VerbosityGate::set_patterns`].
    pub fn set_vmodule(&self, spec: &str) -> Result<(), ConfigError> {
        Ok(self.verbosity.set_patterns(spec)?)
    }

    pub fn set_max_message_len(&self, max: i64) {
        self.max_message_len.store(max, Ordering::Relaxed);
    }

    pub fn max_message_len(&self) -> i64 {
        self.max_message_len.load(Ordering::Relaxed)
    }

    /// Attaches a stack trace to records logged from `file:line`. An empty
    /// string clears the location.
    pub fn set_trace_location(&self, spec: &str) -> Result<(), ConfigError> {
        let location = if spec.is_empty() {
            None
        } else {
            Some(TraceLocation::parse(spec)?)
        };
        *self
            .trace_location
            .write()
            .unwrap_or_else(PoisonError::into_inner) = location;
        Ok(())
    }

    pub fn set_also_to_stderr(&self, enabled: bool) {
        self.also_to_stderr.store(enabled, Ordering::Relaxed);
    }

    pub fn set_stderr_threshold(&self, threshold: Severity) {
        self.stderr_threshold
            .store(threshold.index(), Ordering::Relaxed);
    }

    pub fn stderr_threshold(&self) -> Severity {
        let index = self.stderr_threshold.load(Ordering::Relaxed);
        Severity::ALL
            .get(index)
            .copied()
            .unwrap_or(Severity::Fatal)
    }

    pub fn set_rotation(&self, policy: RotationPolicy) {
        self.sinks.set_policy(policy);
    }

    /// The sink manager, for inspecting current file identities.
    pub fn sinks(&self) -> &SinkManager {
        &self.sinks
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Flushes every open sink.
    pub fn flush(&self) {
        self.sinks.flush();
    }

    /// Waits for in-flight writes, then flushes and closes every sink.
    pub fn shutdown(&self) {
        self.sinks.shutdown();
    }

    /// Starts a thread that flushes `logger` every `interval`.
    ///
    /// The thread holds only a weak reference and exits once the logger is
    /// gone or the returned handle is stopped or dropped.
    pub fn spawn_flush_daemon(logger: &Arc<Logger>, interval: Duration) -> FlushDaemon {
        let (stop, stopped) = mpsc::channel::<()>();
        let logger: Weak<Logger> = Arc::downgrade(logger);
        let handle = thread::Builder::new()
            .name("masklog-flush".into())
            .spawn(move || loop {
                match stopped.recv_timeout(interval) {
                    Err(mpsc::RecvTimeoutError::Timeout) => match logger.upgrade() {
                        Some(logger) => logger.flush(),
                        None => break,
                    },
                    Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
                }
            })
            .ok();
        FlushDaemon {
            stop: Some(stop),
            handle,
        }
    }
}

/// Result of [`Logger::v`]: logs only when the level is enabled.
#[derive(Clone, Copy, Debug)]
pub struct Verbose<'a> {
    logger: Option<&'a Logger>,
}

impl Verbose<'_> {
    pub fn enabled(&self) -> bool {
        self.logger.is_some()
    }

    #[track_caller]
    pub fn info<T: Redact + ?Sized>(&self, payload: &T) {
        if let Some(logger) = self.logger {
            logger.log_caller(Severity::Info, payload);
        }
    }
}

/// Handle of the background flush thread.
#[derive(Debug)]
pub struct FlushDaemon {
    stop: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl FlushDaemon {
    /// Stops the thread and waits for it.
    pub fn stop(mut self) {
        self.halt();
    }

    fn halt(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for FlushDaemon {
    fn drop(&mut self) {
        self.halt();
    }
}

/// Assembles a [`Logger`] from a [`LoggerConfig`] and injected collaborators.
#[derive(Default)]
pub struct LoggerBuilder {
    config: LoggerConfig,
    clock: Option<Arc<dyn Clock>>,
    sinks: Option<Arc<dyn SinkFactory>>,
    on_sink_error: Option<ErrorObserver>,
    on_fatal: Option<FatalAction>,
    stack_capture: Option<Arc<dyn StackCapture>>,
    pid: Option<u32>,
}

impl LoggerBuilder {
    #[must_use]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Replaces the default file sinks in `log_dir`.
    #[must_use]
    pub fn sinks(mut self, sinks: impl SinkFactory + 'static) -> Self {
        self.sinks = Some(Arc::new(sinks));
        self
    }

    #[must_use]
    pub fn on_sink_error(
        mut self,
        observer: impl Fn(&SinkError) + Send + Sync + 'static,
    ) -> Self {
        self.on_sink_error = Some(Arc::new(observer));
        self
    }

    /// Replaces the default terminal action, `process::exit(255)`.
    #[must_use]
    pub fn on_fatal(mut self, action: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_fatal = Some(Arc::new(action));
        self
    }

    #[must_use]
    pub fn stack_capture(mut self, capture: impl StackCapture + 'static) -> Self {
        self.stack_capture = Some(Arc::new(capture));
        self
    }

    #[must_use]
    pub fn pid(mut self, pid: u32) -> Self {
        self.pid = Some(pid);
        self
    }

    /// Validates the configuration and builds the logger.
    pub fn build(self) -> Result<Logger, ConfigError> {
        let verbosity = VerbosityGate::new();
        verbosity.set_patterns(&self.config.vmodule)?;
        let trace_location = self
            .config
            .trace_location
            .as_deref()
            .filter(|spec| !spec.is_empty())
            .map(TraceLocation::parse)
            .transpose()?;
        Ok(self.assemble(verbosity, trace_location))
    }

    fn assemble(self, verbosity: VerbosityGate, trace_location: Option<TraceLocation>) -> Logger {
        let config = self.config;
        verbosity.set_global(config.verbosity);

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let pid = self.pid.unwrap_or_else(std::process::id);
        let program = config.program.clone().unwrap_or_else(default_program);
        let sinks = self.sinks.unwrap_or_else(|| {
            let dir = config.log_dir.clone().unwrap_or_else(std::env::temp_dir);
            Arc::new(FileSinks::new(dir))
        });
        let manager = SinkManager::new(
            program,
            pid,
            config.rotation,
            Arc::clone(&clock),
            sinks,
            self.on_sink_error.unwrap_or_else(stderr_observer),
        );
        let manager = match config.host.as_deref() {
            Some(host) => manager.with_host(host),
            None => manager,
        };

        Logger {
            sinks: manager,
            verbosity,
            clock,
            pid,
            depth_limit: config.depth_limit,
            max_message_len: AtomicI64::new(config.max_message_len),
            trace_location: RwLock::new(trace_location),
            stack_capture: self
                .stack_capture
                .unwrap_or_else(|| Arc::new(BacktraceCapture)),
            also_to_stderr: AtomicBool::new(config.also_to_stderr),
            stderr_threshold: AtomicUsize::new(config.stderr_threshold.index()),
            on_fatal: self.on_fatal.unwrap_or_else(|| Arc::new(exit_process)),
        }
    }
}

/// A logger with the default configuration, writing files into the system
/// temp directory.
impl Default for Logger {
    fn default() -> Self {
        LoggerBuilder::default().assemble(VerbosityGate::new(), None)
    }
}

fn default_program() -> String {
    std::env::current_exe()
        .ok()
        .as_deref()
        .and_then(Path::file_name)
        .and_then(|name| name.to_str())
        .map_or_else(|| "masklog".to_string(), str::to_string)
}

fn exit_process() {
    std::process::exit(255)
}
