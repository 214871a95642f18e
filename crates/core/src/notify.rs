//! Notification dispatch seam
//!
//! The core never delivers mail itself. It hands finished notifications to a
//! [`NotificationSink`]; delivery, retries, and backoff belong to whatever
//! queue sits behind the sink. Transport failures are swallowed by the
//! sinks, and callers additionally log-and-drop any error, so a failed
//! notice can never fail a write.

use std::sync::mpsc::Sender;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;

/// An outgoing notification, ready for delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub subject: String,
    pub body: String,
    pub recipients: Vec<String>,
}

/// Where finished notifications are handed off
pub trait NotificationSink {
    fn send(&self, subject: &str, body: &str, recipients: &[String]) -> Result<()>;
}

/// Sink that only records the intent in the log
///
/// Default wiring for deployments without a delivery queue.
pub struct LogSink;

impl NotificationSink for LogSink {
    fn send(&self, subject: &str, body: &str, recipients: &[String]) -> Result<()> {
        info!(
            subject,
            recipients = recipients.len(),
            body_len = body.len(),
            "Notification queued to log sink"
        );
        Ok(())
    }
}

/// Sink that hands notifications to a caller-owned channel
///
/// The send never blocks; a disconnected receiver drops the message.
pub struct ChannelSink {
    tx: Sender<Notification>,
}

impl ChannelSink {
    pub fn new(tx: Sender<Notification>) -> Self {
        Self { tx }
    }
}

impl NotificationSink for ChannelSink {
    fn send(&self, subject: &str, body: &str, recipients: &[String]) -> Result<()> {
        let notification = Notification {
            subject: subject.to_string(),
            body: body.to_string(),
            recipients: recipients.to_vec(),
        };

        if self.tx.send(notification).is_err() {
            warn!(subject, "Notification queue disconnected, dropping message");
        }

        Ok(())
    }
}

/// Fire-and-forget helper used by the write paths
pub(crate) fn dispatch(
    sink: &dyn NotificationSink,
    subject: &str,
    body: &str,
    recipients: &[String],
) {
    if recipients.is_empty() {
        return;
    }
    if let Err(e) = sink.send(subject, body, recipients) {
        warn!(subject, error = %e, "Failed to queue notification");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_channel_sink_delivers() {
        let (tx, rx) = mpsc::channel();
        let sink = ChannelSink::new(tx);

        sink.send("subject", "body", &["a@example.com".to_string()])
            .unwrap();

        let received = rx.recv().unwrap();
        assert_eq!(received.subject, "subject");
        assert_eq!(received.recipients, vec!["a@example.com".to_string()]);
    }

    #[test]
    fn test_channel_sink_swallows_disconnect() {
        let (tx, rx) = mpsc::channel();
        drop(rx);

        let sink = ChannelSink::new(tx);
        sink.send("subject", "body", &["a@example.com".to_string()])
            .unwrap();
    }

    #[test]
    fn test_dispatch_skips_empty_recipients() {
        let (tx, rx) = mpsc::channel();
        let sink = ChannelSink::new(tx);

        dispatch(&sink, "subject", "body", &[]);
        assert!(rx.try_recv().is_err());
    }
}
