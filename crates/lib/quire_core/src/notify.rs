//! Fire-and-forget registration notices.
//!
//! Registration hands a [`RegistrationNotice`] to a [`Notifier`] and never
//! waits on delivery. A notifier that cannot accept the notice reports it;
//! the caller logs and carries on.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

/// Default capacity of the notice queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Welcome notice sent after a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationNotice {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Notice queue is full")]
    QueueFull,

    #[error("Notice queue is closed")]
    Closed,
}

/// Accepts notices without blocking the caller.
pub trait Notifier: Send + Sync {
    fn enqueue(&self, notice: RegistrationNotice) -> Result<(), NotifyError>;
}

/// Bounded in-process queue drained by a background worker.
#[derive(Debug, Clone)]
pub struct QueueNotifier {
    tx: mpsc::Sender<RegistrationNotice>,
}

impl QueueNotifier {
    /// Create the queue and spawn its worker on the current runtime. The
    /// worker drains remaining notices and exits when `cancel` fires.
    pub fn spawn(capacity: usize, cancel: CancellationToken) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(capacity);
        let handle = tokio::spawn(deliver(rx, cancel));
        (Self { tx }, handle)
    }
}

impl Notifier for QueueNotifier {
    fn enqueue(&self, notice: RegistrationNotice) -> Result<(), NotifyError> {
        self.tx.try_send(notice).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => NotifyError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => NotifyError::Closed,
        })
    }
}

/// Worker loop. Delivery is a structured log line; a mail transport would
/// plug in here.
async fn deliver(mut rx: mpsc::Receiver<RegistrationNotice>, cancel: CancellationToken) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                rx.close();
                while let Some(notice) = rx.recv().await {
                    send_welcome(&notice);
                }
                break;
            }
            next = rx.recv() => match next {
                Some(notice) => send_welcome(&notice),
                None => break,
            },
        }
    }
}

fn send_welcome(notice: &RegistrationNotice) {
    info!(
        user_id = %notice.user_id,
        username = %notice.username,
        email = %notice.email,
        "sending welcome notice"
    );
}

/// Hand a notice to `notifier`, logging instead of failing.
pub fn enqueue_or_warn(notifier: &dyn Notifier, notice: RegistrationNotice) {
    let user_id = notice.user_id;
    if let Err(e) = notifier.enqueue(notice) {
        warn!(%user_id, error = %e, "registration notice dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn notice() -> RegistrationNotice {
        RegistrationNotice {
            user_id: Uuid::now_v7(),
            username: "alice".into(),
            email: "alice@example.com".into(),
        }
    }

    #[derive(Default)]
    struct Recording(Mutex<Vec<RegistrationNotice>>);

    impl Notifier for Recording {
        fn enqueue(&self, notice: RegistrationNotice) -> Result<(), NotifyError> {
            self.0.lock().unwrap().push(notice);
            Ok(())
        }
    }

    struct Broken;

    impl Notifier for Broken {
        fn enqueue(&self, _: RegistrationNotice) -> Result<(), NotifyError> {
            Err(NotifyError::Closed)
        }
    }

    #[tokio::test]
    async fn queue_accepts_until_full() {
        let (tx, _rx) = mpsc::channel(1);
        let notifier = QueueNotifier { tx };
        notifier.enqueue(notice()).unwrap();
        assert!(matches!(
            notifier.enqueue(notice()),
            Err(NotifyError::QueueFull)
        ));
    }

    #[tokio::test]
    async fn closed_queue_reports_closed() {
        let (tx, rx) = mpsc::channel(4);
        drop(rx);
        let notifier = QueueNotifier { tx };
        assert!(matches!(notifier.enqueue(notice()), Err(NotifyError::Closed)));
    }

    #[tokio::test]
    async fn worker_exits_on_cancel() {
        let cancel = CancellationToken::new();
        let (notifier, handle) = QueueNotifier::spawn(4, cancel.clone());
        notifier.enqueue(notice()).unwrap();
        cancel.cancel();
        handle.await.unwrap();
    }

    #[test]
    fn enqueue_or_warn_swallows_failures() {
        enqueue_or_warn(&Broken, notice());

        let recording = Recording::default();
        enqueue_or_warn(&recording, notice());
        assert_eq!(recording.0.lock().unwrap().len(), 1);
    }
}
