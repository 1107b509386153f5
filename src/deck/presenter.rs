//! Presenter: async owner of the controller, fanning state changes out to
//! connected browsers.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock, broadcast};
use tracing::{debug, info};

use super::controller::{DeckSnapshot, DisplayMode, Key, Modal, PresentationController};
use super::export::{PrintHandle, PrintTarget, schedule_print};
use super::slide::{Deck, SlideId};
use crate::share::{Clipboard, ShareOutcome, share_link};

/// Default broadcast channel capacity.
const DEFAULT_BROADCAST_CAPACITY: usize = 64;

/// Events pushed to deck WebSocket clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeckEvent {
    /// Full state, sent on connect and after a lagged receiver.
    Sync { state: DeckSnapshot },
    SlideChanged {
        index: usize,
        slide_id: SlideId,
        position: String,
    },
    ModeChanged { mode: DisplayMode },
    ModalChanged { modal: Option<Modal> },
    /// The browser should open its print dialog.
    PrintRequested,
}

/// Print target that asks connected browsers to print.
struct BroadcastPrinter {
    tx: broadcast::Sender<DeckEvent>,
}

impl PrintTarget for BroadcastPrinter {
    fn print(&self) {
        info!("Requesting print from deck clients");
        let _ = self.tx.send(DeckEvent::PrintRequested);
    }
}

pub struct Presenter {
    deck: Arc<Deck>,
    controller: RwLock<PresentationController>,
    tx: broadcast::Sender<DeckEvent>,
    printer: Arc<dyn PrintTarget>,
    print_settle: Duration,
    pending_print: Mutex<Option<PrintHandle>>,
}

impl Presenter {
    /// Presenter whose prints are requested from WebSocket clients.
    pub fn new(deck: Arc<Deck>, print_settle: Duration) -> Arc<Self> {
        let (tx, _rx) = broadcast::channel(DEFAULT_BROADCAST_CAPACITY);
        let printer = Arc::new(BroadcastPrinter { tx: tx.clone() });
        Self::build(deck, print_settle, tx, printer)
    }

    /// Presenter with a custom print target.
    pub fn with_printer(deck: Arc<Deck>, print_settle: Duration, printer: Arc<dyn PrintTarget>) -> Arc<Self> {
        let (tx, _rx) = broadcast::channel(DEFAULT_BROADCAST_CAPACITY);
        Self::build(deck, print_settle, tx, printer)
    }

    fn build(
        deck: Arc<Deck>,
        print_settle: Duration,
        tx: broadcast::Sender<DeckEvent>,
        printer: Arc<dyn PrintTarget>,
    ) -> Arc<Self> {
        Arc::new(Self {
            controller: RwLock::new(PresentationController::new(Arc::clone(&deck))),
            deck,
            tx,
            printer,
            print_settle,
            pending_print: Mutex::new(None),
        })
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Subscribe to deck events. Each WS client calls this.
    pub fn subscribe(&self) -> broadcast::Receiver<DeckEvent> {
        self.tx.subscribe()
    }

    pub async fn snapshot(&self) -> DeckSnapshot {
        self.controller.read().await.snapshot()
    }

    /// Run `f` against the controller under a read lock (used for rendering).
    pub async fn with_controller<R>(&self, f: impl FnOnce(&PresentationController) -> R) -> R {
        let controller = self.controller.read().await;
        f(&*controller)
    }

    pub async fn next(&self) -> DeckSnapshot {
        self.navigate(PresentationController::next).await
    }

    pub async fn previous(&self) -> DeckSnapshot {
        self.navigate(PresentationController::previous).await
    }

    pub async fn jump_to(&self, index: usize) -> DeckSnapshot {
        self.navigate(|c| c.jump_to(index)).await
    }

    pub async fn handle_key(&self, key: &Key) -> DeckSnapshot {
        self.navigate(|c| c.handle_key(key)).await
    }

    /// Enter or leave export mode. Entering schedules a print after the
    /// settle delay; leaving cancels a print that hasn't fired yet.
    pub async fn set_export_mode(&self, enabled: bool) -> DeckSnapshot {
        // Held across the mode change so the scheduled print always matches
        // the mode that won.
        let mut pending = self.pending_print.lock().await;
        let (changed, snapshot) = {
            let mut controller = self.controller.write().await;
            let changed = controller.set_export_mode(enabled);
            (changed, controller.snapshot())
        };

        if changed {
            info!(mode = ?snapshot.mode, "Display mode changed");
            let _ = self.tx.send(DeckEvent::ModeChanged { mode: snapshot.mode });

            if let Some(handle) = pending.take() {
                handle.cancel();
                debug!("Pending print cancelled");
            }
            if enabled {
                *pending = Some(schedule_print(Arc::clone(&self.printer), self.print_settle));
            }
        }
        snapshot
    }

    pub async fn open_modal(&self, modal: Modal) -> DeckSnapshot {
        let snapshot = {
            let mut controller = self.controller.write().await;
            controller.open_modal(modal);
            controller.snapshot()
        };
        let _ = self.tx.send(DeckEvent::ModalChanged {
            modal: snapshot.modal.clone(),
        });
        snapshot
    }

    pub async fn close_modal(&self) -> DeckSnapshot {
        let (closed, snapshot) = {
            let mut controller = self.controller.write().await;
            (controller.close_modal(), controller.snapshot())
        };
        if closed {
            let _ = self.tx.send(DeckEvent::ModalChanged { modal: None });
        }
        snapshot
    }

    /// Copy `url` to the clipboard, falling back to the share modal so the
    /// viewer can copy it by hand.
    pub async fn share(&self, clipboard: &dyn Clipboard, url: &str) -> ShareOutcome {
        let outcome = share_link(clipboard, url);
        if let ShareOutcome::ManualCopy { url } = &outcome {
            self.open_modal(Modal::Share { url: url.clone() }).await;
        }
        outcome
    }

    /// Wait for a pending print, if any. Returns `false` when none was
    /// pending or it was cancelled.
    pub async fn wait_for_print(&self) -> bool {
        let handle = self.pending_print.lock().await.take();
        match handle {
            Some(handle) => handle.wait().await,
            None => false,
        }
    }

    async fn navigate<F>(&self, op: F) -> DeckSnapshot
    where
        F: FnOnce(&mut PresentationController) -> bool,
    {
        let (moved, snapshot) = {
            let mut controller = self.controller.write().await;
            (op(&mut *controller), controller.snapshot())
        };
        if moved {
            debug!(index = snapshot.index, slide = %snapshot.slide_id, "Slide changed");
            let _ = self.tx.send(DeckEvent::SlideChanged {
                index: snapshot.index,
                slide_id: snapshot.slide_id,
                position: snapshot.position.clone(),
            });
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::ShareError;

    #[derive(Default)]
    struct CountingPrinter(AtomicUsize);

    impl PrintTarget for CountingPrinter {
        fn print(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct DeniedClipboard;

    impl Clipboard for DeniedClipboard {
        fn write_text(&self, _text: &str) -> Result<(), ShareError> {
            Err(ShareError::WriteFailed("permission denied".into()))
        }
    }

    fn presenter(printer: Arc<CountingPrinter>, settle_ms: u64) -> Arc<Presenter> {
        Presenter::with_printer(Arc::new(Deck::pitch()), Duration::from_millis(settle_ms), printer)
    }

    #[tokio::test]
    async fn navigation_broadcasts_only_real_moves() {
        let p = presenter(Arc::default(), 0);
        let mut rx = p.subscribe();

        p.previous().await;
        let snap = p.next().await;
        assert_eq!(snap.index, 1);

        match rx.recv().await.unwrap() {
            DeckEvent::SlideChanged { index, slide_id, .. } => {
                assert_eq!(index, 1);
                assert_eq!(slide_id, SlideId::Problem);
            }
            other => panic!("Expected SlideChanged, got {other:?}"),
        }
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn export_mode_prints_after_settle() {
        let printer = Arc::new(CountingPrinter::default());
        let p = presenter(printer.clone(), 10);

        let snap = p.set_export_mode(true).await;
        assert_eq!(snap.mode, DisplayMode::Export);
        assert!(p.wait_for_print().await);
        assert_eq!(printer.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn leaving_export_cancels_pending_print() {
        let printer = Arc::new(CountingPrinter::default());
        let p = presenter(printer.clone(), 60_000);

        p.set_export_mode(true).await;
        p.set_export_mode(false).await;
        assert!(!p.wait_for_print().await);
        assert_eq!(printer.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_toggles_leave_print_matching_mode() {
        let p = presenter(Arc::default(), 60_000);
        for _ in 0..200 {
            let enter = tokio::spawn({
                let p = Arc::clone(&p);
                async move { p.set_export_mode(true).await }
            });
            let leave = tokio::spawn({
                let p = Arc::clone(&p);
                async move { p.set_export_mode(false).await }
            });
            enter.await.unwrap();
            leave.await.unwrap();

            let mode = p.snapshot().await.mode;
            let pending = p.pending_print.lock().await.is_some();
            assert_eq!(pending, mode == DisplayMode::Export);
            p.set_export_mode(false).await;
        }
    }

    #[tokio::test]
    async fn right_arrow_ignored_while_modal_or_export_active() {
        let p = presenter(Arc::default(), 60_000);

        p.open_modal(Modal::PrintInstructions).await;
        assert_eq!(p.handle_key(&Key::ArrowRight).await.index, 0);
        p.close_modal().await;

        p.set_export_mode(true).await;
        assert_eq!(p.handle_key(&Key::ArrowRight).await.index, 0);
        p.set_export_mode(false).await;

        assert_eq!(p.handle_key(&Key::ArrowRight).await.index, 1);
    }

    #[tokio::test]
    async fn failed_clipboard_opens_share_modal() {
        let p = presenter(Arc::default(), 0);
        let outcome = p.share(&DeniedClipboard, "http://deck.local").await;
        assert_eq!(
            outcome,
            ShareOutcome::ManualCopy {
                url: "http://deck.local".into()
            }
        );
        assert_eq!(
            p.snapshot().await.modal,
            Some(Modal::Share {
                url: "http://deck.local".into()
            })
        );
    }
}
