//! Per-severity streams with rotation and cascading writes.
//!
//! One mutex guards every sink: a record is written to its own severity and
//! each lower one as a single critical section, so two callers can never both
//! decide to rotate the same sink, and a rotation never lands in the middle
//! of a record.

use std::{
    error::Error as _,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
};

use chrono::{DateTime, Local};

use crate::{
    clock::Clock,
    error::SinkError,
    rotation::{next_boundary, RotationPolicy},
    severity::Severity,
    sink::{Sink, SinkFactory},
};

/// Receives sink failures. Logging calls never return them.
pub type ErrorObserver = Arc<dyn Fn(&SinkError) + Send + Sync>;

/// The default observer: one line on stderr.
pub fn stderr_observer() -> ErrorObserver {
    Arc::new(|err: &SinkError| match err.source() {
        Some(source) => eprintln!("masklog: {err}: {source}"),
        None => eprintln!("masklog: {err}"),
    })
}

/// The first label of a host name: `host.example.com` becomes `host`.
pub fn short_hostname(host: &str) -> &str {
    host.split_once('.').map_or(host, |(short, _)| short)
}

struct SinkState {
    stream: Box<dyn Sink>,
    bytes_written: u64,
    next_boundary: Option<DateTime<Local>>,
    identity: String,
}

impl SinkState {
    fn needs_rotation(&self, policy: &RotationPolicy, len: u64, now: DateTime<Local>) -> bool {
        policy.exceeds_size(self.bytes_written, len)
            || self.next_boundary.is_some_and(|boundary| now >= boundary)
    }
}

struct ManagerState {
    sinks: [Option<SinkState>; Severity::ALL.len()],
    policy: RotationPolicy,
}

/// Owns the output stream of every severity.
pub struct SinkManager {
    state: Mutex<ManagerState>,
    program: String,
    host: Option<String>,
    pid: u32,
    seq: AtomicU64,
    clock: Arc<dyn Clock>,
    factory: Arc<dyn SinkFactory>,
    on_error: ErrorObserver,
}

impl SinkManager {
    pub fn new(
        program: impl Into<String>,
        pid: u32,
        policy: RotationPolicy,
        clock: Arc<dyn Clock>,
        factory: Arc<dyn SinkFactory>,
        on_error: ErrorObserver,
    ) -> Self {
        Self {
            state: Mutex::new(ManagerState {
                sinks: Default::default(),
                policy,
            }),
            program: program.into(),
            host: None,
            pid,
            seq: AtomicU64::new(0),
            clock,
            factory,
            on_error,
        }
    }

    /// Adds the short form of `host` to every identity opened from now on.
    /// An empty name is ignored.
    #[must_use]
    pub fn with_host(mut self, host: &str) -> Self {
        let short = short_hostname(host);
        self.host = (!short.is_empty()).then(|| short.to_string());
        self
    }

    fn lock(&self) -> MutexGuard<'_, ManagerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends `record` to the sink of `severity` and of every lower
    /// severity, highest first, rotating each sink as needed.
    pub fn write(&self, severity: Severity, record: &[u8]) {
        let mut state = self.lock();
        let now = self.clock.now();
        let len = record.len() as u64;
        for target in severity.cascade() {
            let ManagerState { sinks, policy } = &mut *state;
            let slot = &mut sinks[target.index()];
            let rotate = match slot {
                Some(sink) => sink.needs_rotation(policy, len, now),
                None => true,
            };
            if rotate {
                if let Some(old) = slot.take() {
                    self.close(target, old);
                }
                *slot = self.open(target, policy, now);
            }
            let Some(sink) = slot.as_mut() else {
                continue;
            };
            match sink.stream.write_all(record) {
                Ok(()) => sink.bytes_written += len,
                Err(source) => self.report(&SinkError::Write {
                    severity: target,
                    identity: sink.identity.clone(),
                    source,
                }),
            }
        }
    }

    fn open(
        &self,
        severity: Severity,
        policy: &RotationPolicy,
        now: DateTime<Local>,
    ) -> Option<SinkState> {
        let identity = self.identity_for(severity, now);
        match self.factory.open(severity, &identity) {
            Ok(stream) => Some(SinkState {
                stream,
                bytes_written: 0,
                next_boundary: next_boundary(now, policy.interval),
                identity,
            }),
            Err(source) => {
                self.report(&SinkError::Open {
                    severity,
                    identity,
                    source,
                });
                None
            }
        }
    }

    fn close(&self, severity: Severity, mut sink: SinkState) {
        if let Err(source) = sink.stream.sync() {
            self.report(&SinkError::Flush {
                severity,
                identity: sink.identity,
                source,
            });
        }
    }

    /// `{program}[.{host}].{SEVERITY}.{YYYYMMDD-HHMMSS}.{pid}.{seq}`; the
    /// sequence number keeps rotations within the same second apart.
    fn identity_for(&self, severity: Severity, now: DateTime<Local>) -> String {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let program = match &self.host {
            Some(host) => format!("{}.{host}", self.program),
            None => self.program.clone(),
        };
        format!(
            "{}.{}.{}.{}.{}",
            program,
            severity.name(),
            now.format("%Y%m%d-%H%M%S"),
            self.pid,
            seq
        )
    }

    fn report(&self, err: &SinkError) {
        (self.on_error)(err);
    }

    pub fn policy(&self) -> RotationPolicy {
        self.lock().policy
    }

    /// Replaces the rotation policy. Time boundaries of open sinks are
    /// recomputed from now.
    pub fn set_policy(&self, policy: RotationPolicy) {
        let mut state = self.lock();
        let now = self.clock.now();
        state.policy = policy;
        for sink in state.sinks.iter_mut().flatten() {
            sink.next_boundary = next_boundary(now, policy.interval);
        }
    }

    /// Identity of the stream currently open for `severity`.
    pub fn identity(&self, severity: Severity) -> Option<String> {
        self.lock().sinks[severity.index()]
            .as_ref()
            .map(|sink| sink.identity.clone())
    }

    /// Bytes written to the current stream of `severity`.
    pub fn bytes_written(&self, severity: Severity) -> Option<u64> {
        self.lock().sinks[severity.index()]
            .as_ref()
            .map(|sink| sink.bytes_written)
    }

    /// Flushes and syncs every open stream.
    pub fn flush(&self) {
        let mut state = self.lock();
        for (severity, slot) in Severity::ALL.into_iter().zip(state.sinks.iter_mut()) {
            let Some(sink) = slot.as_mut() else {
                continue;
            };
            if let Err(source) = sink.stream.sync() {
                self.report(&SinkError::Flush {
                    severity,
                    identity: sink.identity.clone(),
                    source,
                });
            }
        }
    }

    /// Waits for in-flight writes, then flushes and closes every stream.
    ///
    /// A later write opens fresh streams.
    pub fn shutdown(&self) {
        let mut state = self.lock();
        for (severity, slot) in Severity::ALL.into_iter().zip(state.sinks.iter_mut()) {
            if let Some(sink) = slot.take() {
                self.close(severity, sink);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use chrono::{Duration, Local, TimeZone};

    use super::{short_hostname, ErrorObserver, SinkManager};
    use crate::{
        clock::ManualClock,
        error::SinkError,
        rotation::{Interval, RotationPolicy},
        severity::Severity,
        sink::{MemorySinks, Sink, SinkFactory},
    };

    fn manager(policy: RotationPolicy) -> (SinkManager, MemorySinks, Arc<ManualClock>) {
        let sinks = MemorySinks::new();
        let clock = Arc::new(ManualClock::new(
            Local.with_ymd_and_hms(2019, 2, 28, 15, 4, 31).unwrap(),
        ));
        let manager = SinkManager::new(
            "app",
            1234,
            policy,
            clock.clone(),
            Arc::new(sinks.clone()),
            super::stderr_observer(),
        );
        (manager, sinks, clock)
    }

    fn collecting_observer() -> (ErrorObserver, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let observer: ErrorObserver = Arc::new(move |err: &SinkError| {
            sink.lock().unwrap().push(err.to_string());
        });
        (observer, seen)
    }

    #[test]
    fn records_cascade_to_lower_severities() {
        let (manager, sinks, _) = manager(RotationPolicy::default());
        manager.write(Severity::Error, b"E boom\n");

        for severity in [Severity::Error, Severity::Warning, Severity::Info] {
            assert_eq!(sinks.contents(severity), "E boom\n");
        }
        assert_eq!(sinks.contents(Severity::Fatal), "");
        assert!(manager.identity(Severity::Fatal).is_none());
    }

    #[test]
    fn identities_embed_program_time_pid_and_sequence() {
        let (manager, _, _) = manager(RotationPolicy::default());
        manager.write(Severity::Warning, b"w\n");
        assert_eq!(
            manager.identity(Severity::Warning).unwrap(),
            "app.WARNING.20190228-150431.1234.0"
        );
        assert_eq!(
            manager.identity(Severity::Info).unwrap(),
            "app.INFO.20190228-150431.1234.1"
        );
    }

    #[test]
    fn short_hostname_keeps_the_first_label() {
        assert_eq!(short_hostname(""), "");
        assert_eq!(short_hostname("host"), "host");
        assert_eq!(short_hostname("host.google.com"), "host");
    }

    #[test]
    fn host_follows_the_program_in_identities() {
        let (named, _, _) = manager(RotationPolicy::default());
        let named = named.with_host("web-3.example.com");
        named.write(Severity::Info, b"i\n");
        assert_eq!(
            named.identity(Severity::Info).unwrap(),
            "app.web-3.INFO.20190228-150431.1234.0"
        );

        let (unnamed, _, _) = manager(RotationPolicy::default());
        let unnamed = unnamed.with_host(".local");
        unnamed.write(Severity::Info, b"i\n");
        assert_eq!(
            unnamed.identity(Severity::Info).unwrap(),
            "app.INFO.20190228-150431.1234.0"
        );
    }

    #[test]
    fn size_threshold_rotates_before_the_write() {
        let (manager, sinks, _) = manager(RotationPolicy::default().with_max_size(512));
        manager.write(Severity::Info, b"x\n");
        let first = manager.identity(Severity::Info).unwrap();

        let big = vec![b'x'; 512];
        manager.write(Severity::Info, &big);
        let second = manager.identity(Severity::Info).unwrap();
        assert_ne!(first, second);
        // The oversized record went whole into the fresh sink.
        assert_eq!(manager.bytes_written(Severity::Info), Some(512));

        manager.write(Severity::Info, b"x\n");
        let third = manager.identity(Severity::Info).unwrap();
        assert_ne!(second, third);
        assert!(manager.bytes_written(Severity::Info).unwrap() < 512);
        assert_eq!(sinks.identities(Severity::Info).len(), 3);
    }

    #[test]
    fn time_boundary_rotates() {
        let policy = RotationPolicy::default().with_interval(Interval::Minute);
        let (manager, sinks, clock) = manager(policy);
        manager.write(Severity::Info, b"a\n");
        clock.advance(Duration::seconds(28));
        manager.write(Severity::Info, b"b\n");
        assert_eq!(sinks.identities(Severity::Info).len(), 1);

        clock.advance(Duration::seconds(1));
        manager.write(Severity::Info, b"c\n");
        let identities = sinks.identities(Severity::Info);
        assert_eq!(identities.len(), 2);
        assert!(identities[1].contains("20190228-150500"));
        assert_eq!(sinks.contents(Severity::Info), "c\n");
        assert_eq!(sinks.all_contents(Severity::Info), "a\nb\nc\n");
    }

    #[test]
    fn set_policy_applies_to_open_sinks() {
        let (manager, sinks, clock) = manager(RotationPolicy::default());
        manager.write(Severity::Info, b"a\n");
        manager.set_policy(RotationPolicy::default().with_interval(Interval::Hour));
        assert_eq!(manager.policy().interval, Interval::Hour);

        clock.advance(Duration::hours(1));
        manager.write(Severity::Info, b"b\n");
        assert_eq!(sinks.identities(Severity::Info).len(), 2);
    }

    #[test]
    fn concurrent_writers_never_split_or_interleave_records() {
        const THREADS: usize = 8;
        const WRITES: usize = 100;
        const RECORD_LEN: usize = 40;
        const MAX_SIZE: u64 = 300;
        let per_stream = MAX_SIZE as usize / RECORD_LEN;

        let (manager, sinks, _) = manager(RotationPolicy::default().with_max_size(MAX_SIZE));
        std::thread::scope(|scope| {
            for thread in 0..THREADS {
                let manager = &manager;
                scope.spawn(move || {
                    for write in 0..WRITES {
                        let head = format!("t{thread}-r{write:03}");
                        let record = format!("{head:<width$}\n", width = RECORD_LEN - 1);
                        manager.write(Severity::Error, record.as_bytes());
                    }
                });
            }
        });

        for severity in [Severity::Error, Severity::Warning, Severity::Info] {
            let streams = sinks.streams(severity);
            let mut seen = std::collections::BTreeSet::new();
            for (index, stream) in streams.iter().enumerate() {
                assert!(stream.len() as u64 <= MAX_SIZE, "{severity}: {stream:?}");
                assert!(stream.ends_with('\n'), "{severity}: {stream:?}");
                let lines: Vec<&str> = stream.lines().collect();
                if index + 1 < streams.len() {
                    // Only the newest stream may be partly filled.
                    assert_eq!(lines.len(), per_stream, "{severity}: {stream:?}");
                }
                for line in lines {
                    assert_eq!(line.len(), RECORD_LEN - 1, "{severity}: {line:?}");
                    assert!(line.starts_with('t') && line.contains("-r"), "{line:?}");
                    assert!(seen.insert(line.trim_end().to_string()), "{line:?}");
                }
            }
            assert_eq!(seen.len(), THREADS * WRITES, "{severity}");
            assert_eq!(
                streams.len(),
                (THREADS * WRITES).div_ceil(per_stream),
                "{severity}"
            );
        }
        assert!(sinks.streams(Severity::Fatal).is_empty());
    }

    struct FailingSinks;

    impl SinkFactory for FailingSinks {
        fn open(&self, _severity: Severity, _identity: &str) -> io::Result<Box<dyn Sink>> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }
    }

    #[test]
    fn open_failures_go_to_the_observer() {
        let (observer, seen) = collecting_observer();
        let clock = Arc::new(ManualClock::new(Local::now()));
        let manager = SinkManager::new(
            "app",
            1,
            RotationPolicy::default(),
            clock,
            Arc::new(FailingSinks),
            observer,
        );
        manager.write(Severity::Warning, b"lost\n");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].contains("WARNING"));
        assert!(seen[1].contains("INFO"));
    }

    #[test]
    fn shutdown_closes_and_later_writes_reopen() {
        let (manager, sinks, _) = manager(RotationPolicy::default());
        manager.write(Severity::Info, b"a\n");
        manager.flush();
        manager.shutdown();
        assert!(manager.identity(Severity::Info).is_none());

        manager.write(Severity::Info, b"b\n");
        assert_eq!(sinks.identities(Severity::Info).len(), 2);
    }

    #[test]
    fn rotation_on_disk_produces_distinct_files() {
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(ManualClock::new(Local::now()));
        let manager = SinkManager::new(
            "app",
            7,
            RotationPolicy::default().with_max_size(64),
            clock,
            Arc::new(crate::sink::FileSinks::new(dir.path())),
            super::stderr_observer(),
        );
        manager.write(Severity::Info, &[b'a'; 40]);
        manager.write(Severity::Info, &[b'b'; 40]);
        manager.shutdown();

        let mut files: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        files.sort();
        assert_eq!(files.len(), 2);
        for file in files {
            assert_eq!(std::fs::metadata(file).unwrap().len(), 40);
        }
    }
}
