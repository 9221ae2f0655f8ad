//! In-memory stand-ins for the network

use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, HashSet},
    io::{self, Cursor, Read, Write},
    sync::{Arc, Mutex},
};

use crate::{
    outside::{ContentFetcher, PageFetcher, SnapshotLookup},
    result::{Error, Result},
    types::ArchivedPageReference,
};

pub const TIMESTAMP: &str = "20191210043532";

/// Run `f`, returning its result along with the lines it logged
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .without_time()
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    let out = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
    (out, logs)
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct FakePages {
    pages: HashMap<String, String>,
    fetched: RefCell<Vec<String>>,
}

impl FakePages {
    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.borrow().clone()
    }
}

impl PageFetcher for FakePages {
    fn fetch(&self, url: &str) -> Result<String> {
        self.fetched.borrow_mut().push(url.to_owned());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| Error::fetch(url, "HTTP status 404"))
    }
}

#[derive(Default)]
pub struct FakeArchive {
    archived: HashSet<String>,
    lookups: Cell<usize>,
}

impl FakeArchive {
    pub fn snapshot_url(url: &str) -> String {
        format!("https://web.archive.org/web/{TIMESTAMP}/{url}")
    }

    pub fn with_snapshot(mut self, url: impl Into<String>) -> Self {
        self.archived.insert(url.into());
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.get()
    }
}

impl SnapshotLookup for FakeArchive {
    fn closest(&self, url: &str) -> Result<Option<ArchivedPageReference>> {
        self.lookups.set(self.lookups.get() + 1);
        Ok(self.archived.contains(url).then(|| ArchivedPageReference {
            url: Self::snapshot_url(url),
            timestamp: Some(TIMESTAMP.to_owned()),
        }))
    }
}

#[derive(Default)]
pub struct FakeContent {
    bodies: HashMap<String, Vec<u8>>,
    opened: RefCell<Vec<String>>,
}

impl FakeContent {
    pub fn with_body(mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.bodies.insert(url.into(), body.into());
        self
    }

    /// Number of downloads started
    pub fn downloads(&self) -> usize {
        self.opened.borrow().len()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }
}

impl ContentFetcher for FakeContent {
    fn open(&self, url: &str) -> Result<Box<dyn Read + Send>> {
        self.opened.borrow_mut().push(url.to_owned());
        match self.bodies.get(url) {
            Some(body) => Ok(Box::new(Cursor::new(body.clone()))),
            None => Err(Error::fetch(url, "HTTP status 404")),
        }
    }
}
