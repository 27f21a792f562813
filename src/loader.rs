use crate::error::EditorError;
use crate::image_source::ImageSource;
use image::RgbaImage;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub type Notifier = Arc<dyn Fn() + Send + Sync>;

/// Result of a load that was still current when it finished.
pub struct LoadCompletion {
    pub id: u64,
    pub source: ImageSource,
    pub outcome: Result<RgbaImage, EditorError>,
}

/// Decodes images on worker threads.
///
/// Each request gets a fresh id; only the completion for the latest id is
/// handed out, so a slow earlier load can never overwrite a newer one.
pub struct ImageLoader {
    next_id: u64,
    pending: Option<u64>,
    tx: Sender<LoadCompletion>,
    rx: Receiver<LoadCompletion>,
    notify: Option<Notifier>,
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageLoader {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            next_id: 0,
            pending: None,
            tx,
            rx,
            notify: None,
        }
    }

    /// Called from the worker after each completion, e.g. to wake the UI.
    pub fn with_notifier(mut self, notify: Notifier) -> Self {
        self.notify = Some(notify);
        self
    }

    pub fn set_notifier(&mut self, notify: Notifier) {
        self.notify = Some(notify);
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Starts decoding `source`, superseding any load in flight.
    pub fn request(&mut self, source: ImageSource) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.pending = Some(id);
        log::info!("Loading image {source} (request {id})");

        let tx = self.tx.clone();
        let notify = self.notify.clone();
        std::thread::spawn(move || {
            let outcome = source.decode();
            // The loader may be gone already
            let _ = tx.send(LoadCompletion {
                id,
                source,
                outcome,
            });
            if let Some(notify) = notify {
                notify();
            }
        });
        id
    }

    /// Forgets the pending request; its completion will be ignored.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Non-blocking: the completion of the current request, if it arrived.
    pub fn poll(&mut self) -> Option<LoadCompletion> {
        while let Ok(done) = self.rx.try_recv() {
            if let Some(done) = self.accept(done) {
                return Some(done);
            }
        }
        None
    }

    /// Blocks until the current request completes or `timeout` passes.
    pub fn wait(&mut self, timeout: Duration) -> Option<LoadCompletion> {
        let deadline = Instant::now() + timeout;
        while self.pending.is_some() {
            let remaining = deadline.checked_duration_since(Instant::now())?;
            let done = self.rx.recv_timeout(remaining).ok()?;
            if let Some(done) = self.accept(done) {
                return Some(done);
            }
        }
        None
    }

    fn accept(&mut self, done: LoadCompletion) -> Option<LoadCompletion> {
        if self.pending == Some(done.id) {
            self.pending = None;
            Some(done)
        } else {
            log::debug!("Discarding superseded load of {} (request {})", done.source, done.id);
            None
        }
    }
}
