use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Last-write-wins input scheduler: a submitted value is emitted on the
/// channel only after `delay` of quiescence, and every new submission
/// cancels the previous pending one. Intermediate values are never queued.
///
/// One instance per input field; fields debounce independently even when
/// they share an output channel. Dropping the scheduler aborts whatever is
/// pending, so an unmounted view cannot receive a late edit.
pub struct Debouncer<T> {
    delay: Duration,
    tx: mpsc::UnboundedSender<T>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration, tx: mpsc::UnboundedSender<T>) -> Self {
        Debouncer { delay, tx, pending: None }
    }

    pub fn submit(&mut self, value: T) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        let tx = self.tx.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(value);
        }));
    }
}

impl<T> Debouncer<T> {
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    #[tokio::test(start_paused = true)]
    async fn emits_only_the_last_value_per_quiet_window() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(DELAY, tx);

        debouncer.submit("w");
        debouncer.submit("we");
        debouncer.submit("web");

        assert_eq!(rx.recv().await, Some("web"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn separate_windows_emit_separately() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(DELAY, tx);

        debouncer.submit("first");
        assert_eq!(rx.recv().await, Some("first"));

        debouncer.submit("second");
        assert_eq!(rx.recv().await, Some("second"));
    }

    #[tokio::test(start_paused = true)]
    async fn an_edit_within_the_window_restarts_it() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(DELAY, tx);

        debouncer.submit("stale");
        tokio::time::sleep(DELAY / 2).await;
        debouncer.submit("fresh");

        // Half a window after the second edit the first would have fired.
        tokio::time::sleep(DELAY / 2).await;
        assert!(rx.try_recv().is_err());

        assert_eq!(rx.recv().await, Some("fresh"));
    }

    #[tokio::test(start_paused = true)]
    async fn fields_debounce_independently_on_a_shared_channel() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut hostname = Debouncer::new(DELAY, tx.clone());
        let mut os = Debouncer::new(DELAY, tx);

        hostname.submit(("hostname", "web"));
        os.submit(("os", "debian"));

        let mut got = vec![rx.recv().await.unwrap(), rx.recv().await.unwrap()];
        got.sort();
        assert_eq!(got, vec![("hostname", "web"), ("os", "debian")]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_discards_the_pending_value() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(DELAY, tx);

        debouncer.submit("never");
        debouncer.cancel();

        tokio::time::sleep(DELAY * 2).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_scheduler_aborts_pending_emission() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(DELAY, tx);

        debouncer.submit("late");
        drop(debouncer);

        tokio::time::sleep(DELAY * 2).await;
        assert_eq!(rx.recv().await, None);
    }
}
