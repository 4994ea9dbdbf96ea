//! Log backend for editing sessions
//!
//! The crate logs through the `log` facade everywhere. [`init`] installs a
//! `tracing-subscriber` registry as the process-wide backend; the
//! subscriber's `tracing-log` bridge forwards `log` records into it. Output
//! goes to stderr and, optionally, is mirrored to a file.
//!
//! The level sits behind a reload handle, so [`set_level`] (or a later
//! [`init`]) can raise or lower verbosity after installation.

use once_cell::sync::OnceCell;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::Subscriber;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    reload,
    util::SubscriberInitExt,
    Registry,
};

type LevelHandle = reload::Handle<LevelFilter, Registry>;

struct Installed {
    level: LevelHandle,
    mirror: Option<SharedWriter<File>>,
}

static LOGGING: OnceCell<Installed> = OnceCell::new();

/// Install the backend (first call only) and apply `level`
///
/// `file` is opened in append mode on the first call; later calls keep the
/// sinks they find and only change the level. When the host already
/// installed a global subscriber, that one is kept.
pub fn init(level: log::LevelFilter, file: Option<&Path>) -> io::Result<()> {
    LOGGING.get_or_try_init(|| {
        let mirror = match file {
            Some(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                Some(SharedWriter::new(file))
            }
            None => None,
        };
        let (subscriber, handle) = build_subscriber(to_tracing(level), io::stderr, mirror.clone());
        if let Err(e) = subscriber.try_init() {
            log::debug!("A log backend is already installed, keeping it: {}", e);
        }
        Ok::<_, io::Error>(Installed {
            level: handle,
            mirror,
        })
    })?;

    set_level(level);
    Ok(())
}

/// Change the active level of the installed backend
pub fn set_level(level: log::LevelFilter) {
    log::set_max_level(level);
    if let Some(installed) = LOGGING.get() {
        if let Err(e) = installed.level.modify(|filter| *filter = to_tracing(level)) {
            log::debug!("Log level not applied: {}", e);
        }
    }
}

/// Flush stderr and the file mirror
pub fn flush() {
    let _ = io::stderr().flush();
    if let Some(mirror) = LOGGING.get().and_then(|installed| installed.mirror.as_ref()) {
        if let Err(e) = mirror.make_writer().flush() {
            eprintln!("Failed to flush log file: {}", e);
        }
    }
}

fn to_tracing(level: log::LevelFilter) -> LevelFilter {
    match level {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    }
}

/// Registry with a reloadable level, a console layer and an optional mirror
fn build_subscriber<W>(
    level: LevelFilter,
    console: W,
    mirror: Option<SharedWriter<File>>,
) -> (impl Subscriber + Send + Sync + 'static, LevelHandle)
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let (filter, handle) = reload::Layer::new(level);

    let console = fmt::layer()
        .with_writer(console)
        .with_target(true)
        .without_time();
    let mirror = mirror.map(|writer| {
        fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
    });

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(mirror);
    (subscriber, handle)
}

/// Cloneable writer over one shared sink
pub(crate) struct SharedWriter<W> {
    inner: Arc<Mutex<W>>,
}

impl<W> Clone for SharedWriter<W> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<W> SharedWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }
}

pub(crate) struct SharedGuard<W> {
    inner: Arc<Mutex<W>>,
}

impl<W: Write> Write for SharedGuard<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| io::Error::other("log writer lock poisoned"))?;
        guard.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| io::Error::other("log writer lock poisoned"))?;
        guard.flush()
    }
}

impl<'a, W: Write + 'a> MakeWriter<'a> for SharedWriter<W> {
    type Writer = SharedGuard<W>;

    fn make_writer(&'a self) -> Self::Writer {
        SharedGuard {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// In-memory capture for tests: a scoped subscriber and the buffer it writes
#[cfg(test)]
pub(crate) fn capture(
    level: log::LevelFilter,
) -> (impl Subscriber + Send + Sync + 'static, LevelHandle, SharedWriter<Vec<u8>>) {
    // The `log` bridge is only attached by a global install.
    init(log::LevelFilter::Warn, None).unwrap();

    let buffer = SharedWriter::new(Vec::new());
    let (subscriber, handle) = build_subscriber(to_tracing(level), buffer.clone(), None);
    (subscriber, handle, buffer)
}

#[cfg(test)]
impl SharedWriter<Vec<u8>> {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.inner.lock().unwrap()).into_owned()
    }
}
