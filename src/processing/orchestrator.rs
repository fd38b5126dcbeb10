//! Per-item processing.
//!
//! Each submitted item runs on its own task: compress, report the terminal
//! status, then hand the compressed bytes to the analyzer on a detached task.
//! All state changes leave through one update channel.

use std::sync::{Arc, Mutex};
use futures_util::future::join_all;
use futures_util::FutureExt;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, warn};

use crate::analysis::Analyzer;
use crate::core::{CompressionSettings, ImageItem, ItemId, ItemUpdate, SourceFile};

use super::compressor::Compressor;
use super::guard::ActiveSet;

#[derive(Clone)]
pub struct Orchestrator {
    compressor: Compressor,
    analyzer: Option<Arc<dyn Analyzer>>,
    settings: Arc<CompressionSettings>,
    active_tasks: ActiveSet,
    updates: UnboundedSender<ItemUpdate>,
    /// Spawned processing and analysis tasks not yet awaited
    pending: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl Orchestrator {
    /// Creates an orchestrator and the receiving end of its update channel.
    ///
    /// Without an analyzer, items simply never receive commentary.
    pub fn new(
        compressor: Compressor,
        analyzer: Option<Arc<dyn Analyzer>>,
        settings: CompressionSettings,
    ) -> (Self, UnboundedReceiver<ItemUpdate>) {
        let (updates, rx) = mpsc::unbounded_channel();
        let orchestrator = Self {
            compressor,
            analyzer,
            settings: Arc::new(settings),
            active_tasks: ActiveSet::new(),
            updates,
            pending: Arc::new(Mutex::new(Vec::new())),
        };
        (orchestrator, rx)
    }

    /// Accepts a file and starts processing it in the background.
    ///
    /// Returns the new pending item immediately. Must be called from within
    /// a tokio runtime.
    pub fn submit(&self, file: SourceFile) -> ImageItem {
        let item = ImageItem::new(file);
        debug!("Accepted '{}' as item {}", item.file_name, item.id);
        self.emit(ItemUpdate::Added(item.clone()));

        let this = self.clone();
        let queued = item.clone();
        self.track(tokio::spawn(async move { this.process(&queued).await }));
        item
    }

    /// Drives one item through compression and, on success, analysis.
    ///
    /// A call for an id that is already being processed is a no-op.
    /// Failures end up as a `Failed` update, never as a panic or error here.
    pub async fn process(&self, item: &ImageItem) {
        let id = item.id;
        let Some(_guard) = self.active_tasks.try_acquire(id) else {
            debug!("Item {id} is already being processed; ignoring");
            return;
        };

        self.emit(ItemUpdate::Compressing(id));

        match self.compressor.compress_with(Arc::clone(&item.source), &self.settings).await {
            Ok(outcome) => {
                info!(
                    "'{}' compressed {} -> {} bytes at q{} in {} attempt(s)",
                    item.file_name,
                    item.original_size,
                    outcome.bytes.len(),
                    outcome.quality,
                    outcome.attempts()
                );
                let bytes: Arc<[u8]> = Arc::from(outcome.bytes);
                self.emit(ItemUpdate::Compressed { id, bytes: Arc::clone(&bytes) });
                self.spawn_analysis(id, bytes);
            }
            Err(e) => {
                warn!("Compression failed for '{}': {}", item.file_name, e);
                self.emit(ItemUpdate::Failed { id, message: e.to_string() });
            }
        }
    }

    /// Ids currently held by the processing guard.
    pub fn active_tasks(&self) -> &ActiveSet {
        &self.active_tasks
    }

    /// Waits until every spawned task, including analyses started along the
    /// way, has finished.
    pub async fn wait_idle(&self) {
        loop {
            let batch = std::mem::take(&mut *self.lock_pending());
            if batch.is_empty() {
                return;
            }
            for result in join_all(batch).await {
                log_abnormal(result);
            }
        }
    }

    // Analysis runs on its own task so a panic inside the analyzer surfaces
    // as a JoinError here instead of tearing down anything else.
    fn spawn_analysis(&self, id: ItemId, bytes: Arc<[u8]>) {
        let Some(analyzer) = self.analyzer.clone() else {
            return;
        };
        let updates = self.updates.clone();

        let analysis = tokio::spawn(async move { analyzer.analyze(&bytes).await });
        self.track(tokio::spawn(async move {
            match analysis.await {
                Ok(text) => {
                    debug!("Analysis ready for item {id}");
                    send_update(&updates, ItemUpdate::Analysed { id, text });
                }
                Err(e) => warn!("Analysis for item {id} failed: {e}"),
            }
        }));
    }

    fn emit(&self, update: ItemUpdate) {
        send_update(&self.updates, update);
    }

    // Finished handles are joined on the way out so a panic is still logged.
    fn track(&self, handle: JoinHandle<()>) {
        let mut pending = self.lock_pending();
        let (finished, running): (Vec<_>, Vec<_>) =
            std::mem::take(&mut *pending).into_iter().partition(|h| h.is_finished());
        *pending = running;
        pending.push(handle);
        drop(pending);

        for handle in finished {
            if let Some(result) = handle.now_or_never() {
                log_abnormal(result);
            }
        }
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn send_update(updates: &UnboundedSender<ItemUpdate>, update: ItemUpdate) {
    if updates.send(update).is_err() {
        debug!("Update receiver dropped; discarding update");
    }
}

fn log_abnormal(result: Result<(), JoinError>) {
    if let Err(e) = result {
        warn!("Background task ended abnormally: {e}");
    }
}
