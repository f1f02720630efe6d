//! Background worker running VCS calls off the event loop.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::core::{Event, VcsProvider};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum WorkerRequest {
    Diff { path: String },
    Files,
}

pub(crate) struct DiffWorker {
    request_tx: Option<Sender<WorkerRequest>>,
    response_rx: Receiver<Event>,
    handle: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for DiffWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiffWorker")
            .field("running", &self.handle.is_some())
            .finish()
    }
}

pub(crate) fn spawn_diff_worker(provider: Arc<dyn VcsProvider>, target: String) -> DiffWorker {
    let (request_tx, request_rx) = mpsc::channel::<WorkerRequest>();
    let (response_tx, response_rx) = mpsc::channel::<Event>();

    let handle = thread::spawn(move || worker_loop(&*provider, &target, request_rx, response_tx));

    DiffWorker {
        request_tx: Some(request_tx),
        response_rx,
        handle: Some(handle),
    }
}

impl DiffWorker {
    pub(crate) fn request(&self, request: WorkerRequest) {
        let Some(tx) = &self.request_tx else {
            return;
        };
        if tx.send(request).is_err() {
            tracing::warn!("diff worker is gone");
        }
    }

    pub(crate) fn try_recv(&self) -> Option<Event> {
        self.response_rx.try_recv().ok()
    }
}

impl Drop for DiffWorker {
    fn drop(&mut self) {
        // closing the channel ends worker_loop
        self.request_tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Requests that survive draining the queue: the newest diff plus at most one
/// file listing.
#[derive(Debug, Default, PartialEq, Eq)]
struct Batch {
    files: bool,
    diff: Option<String>,
}

impl Batch {
    fn push(&mut self, request: WorkerRequest) {
        match request {
            WorkerRequest::Files => self.files = true,
            WorkerRequest::Diff { path } => self.diff = Some(path),
        }
    }
}

fn worker_loop(
    provider: &dyn VcsProvider,
    target: &str,
    request_rx: Receiver<WorkerRequest>,
    response_tx: Sender<Event>,
) {
    while let Ok(first) = request_rx.recv() {
        let mut batch = Batch::default();
        batch.push(first);
        while let Ok(next) = request_rx.try_recv() {
            batch.push(next);
        }

        for event in run_batch(provider, target, batch) {
            if response_tx.send(event).is_err() {
                return;
            }
        }
    }
}

fn run_batch(provider: &dyn VcsProvider, target: &str, batch: Batch) -> Vec<Event> {
    let mut events = Vec::with_capacity(2);

    if batch.files {
        tracing::debug!(target, "listing changed files");
        let result = provider
            .file_listing(target)
            .map_err(|err| err.to_string());
        events.push(Event::FilesListed { result });
    }

    if let Some(path) = batch.diff {
        tracing::debug!(%path, target, "fetching diff");
        let content = provider.fetch_diff(target, &path);
        events.push(Event::DiffLoaded { path, content });
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_keeps_latest_diff_and_one_listing() {
        let mut batch = Batch::default();
        batch.push(WorkerRequest::Diff {
            path: "a.rs".to_string(),
        });
        batch.push(WorkerRequest::Files);
        batch.push(WorkerRequest::Diff {
            path: "b.rs".to_string(),
        });
        batch.push(WorkerRequest::Files);

        assert_eq!(
            batch,
            Batch {
                files: true,
                diff: Some("b.rs".to_string())
            }
        );
    }
}
