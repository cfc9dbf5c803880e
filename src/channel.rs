//! Cross-context control channel.
//!
//! Fire-and-forget: no acknowledgement, no reply, and a vanished receiver is
//! not an error for the sender. Payloads from one sender arrive in send order.

use crate::models::control::ControlSignal;
use log::debug;
use serde_json::Value;
use tokio::sync::mpsc;

#[derive(Clone, Debug)]
pub struct ControlSender {
    tx: mpsc::UnboundedSender<Value>,
}

#[derive(Debug)]
pub struct ControlReceiver {
    rx: mpsc::UnboundedReceiver<Value>,
}

pub fn control_channel() -> (ControlSender, ControlReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ControlSender { tx }, ControlReceiver { rx })
}

impl ControlSender {
    pub fn post(&self, signal: ControlSignal) {
        self.post_raw(signal.to_payload());
    }

    /// Posts an arbitrary payload; the channel may carry unrelated traffic.
    pub fn post_raw(&self, payload: Value) {
        if let Err(e) = self.tx.send(payload) {
            debug!("Control payload dropped, receiver gone: {}", e.0);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl ControlReceiver {
    /// Next payload, or `None` once every sender is dropped.
    pub async fn recv(&mut self) -> Option<Value> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<Value> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn delivers_in_send_order() {
        let (tx, mut rx) = control_channel();
        tx.post(ControlSignal::Open);
        tx.post_raw(json!({ "unrelated": true }));
        tx.post(ControlSignal::Close);
        drop(tx);

        assert_eq!(rx.recv().await, Some(json!("superion:open")));
        assert_eq!(rx.recv().await, Some(json!({ "unrelated": true })));
        assert_eq!(rx.recv().await, Some(json!("superion:close")));
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn posting_without_receiver_is_silent() {
        let (tx, rx) = control_channel();
        drop(rx);
        assert!(tx.is_closed());
        tx.post(ControlSignal::Close);
    }
}
