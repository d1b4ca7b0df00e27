use lexrag_core::notice::Notice;
use tokio::sync::mpsc::UnboundedSender;

/// Fire-and-forget channel for transient notifications.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: UnboundedSender<Notice>,
}

impl Notifier {
    pub fn new(sender: UnboundedSender<Notice>) -> Self {
        Self { sender }
    }

    pub fn notify(&self, notice: Notice) {
        tracing::debug!("[Notifier] {:?}: {}", notice.level, notice.title);
        // Non-blocking send - if the view has gone away, we just skip
        let _ = self.sender.send(notice);
    }
}
