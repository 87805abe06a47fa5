//! Fire-and-forget side-effect dispatch.
//!
//! XP awards and reply notifications ride a bounded channel to a worker
//! task. Submitting never waits and never fails the triggering mutation:
//! a full queue or a failing sink is logged and the message dropped.

use std::sync::Arc;
use tokio::sync::mpsc;

use super::traits::{NotificationKind, NotificationSink, XpService};

/// Default capacity of the hook queue.
pub const DEFAULT_HOOK_CAPACITY: usize = 256;

/// A queued side effect.
#[derive(Debug)]
pub enum HookMessage {
    AwardXp {
        user_id: i64,
        amount: i64,
    },
    Notify {
        user_id: i64,
        kind: NotificationKind,
        payload: serde_json::Value,
    },
}

/// Handle for submitting side effects.
///
/// All methods are fire-and-forget and return immediately.
#[derive(Clone)]
pub struct HookDispatcher {
    sender: mpsc::Sender<HookMessage>,
}

impl HookDispatcher {
    /// Spawn the worker task and return a handle to it.
    pub fn spawn(
        xp: Arc<dyn XpService>,
        notifications: Arc<dyn NotificationSink>,
        capacity: usize,
    ) -> Self {
        let (sender, mut receiver) = mpsc::channel(capacity);

        tokio::spawn(async move {
            while let Some(message) = receiver.recv().await {
                match message {
                    HookMessage::AwardXp { user_id, amount } => {
                        if let Err(e) = xp.award(user_id, amount).await {
                            tracing::warn!(user_id, amount, "Failed to award XP: {}", e);
                        }
                    }
                    HookMessage::Notify {
                        user_id,
                        kind,
                        payload,
                    } => {
                        if let Err(e) = notifications.notify(user_id, kind, payload).await {
                            tracing::warn!(
                                user_id,
                                kind = kind.as_str(),
                                "Failed to deliver notification: {}",
                                e
                            );
                        }
                    }
                }
            }
        });

        Self { sender }
    }

    /// Queue an XP award.
    pub fn award_xp(&self, user_id: i64, amount: i64) {
        self.submit(HookMessage::AwardXp { user_id, amount });
    }

    /// Queue a notification.
    pub fn notify(&self, user_id: i64, kind: NotificationKind, payload: serde_json::Value) {
        self.submit(HookMessage::Notify {
            user_id,
            kind,
            payload,
        });
    }

    fn submit(&self, message: HookMessage) {
        if let Err(e) = self.sender.try_send(message) {
            tracing::warn!("Hook queue full, dropping side effect: {}", e);
        }
    }
}
