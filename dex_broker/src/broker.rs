//! Action request broker.
//!
//! Owns at most one outstanding goal toward one action server. The
//! consumer side sends, cancels, and drains; the transport's callback
//! context feeds progress and the terminal completion back through the
//! [`BrokerInbox`] handle. The inbox is the only state shared between the
//! two contexts.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{info, warn};

use crate::event::{BrokerEvent, CompletionNotice, EventSink, GoalStatus};
use crate::queue::FeedbackQueue;
use crate::transport::{ActionSpec, GoalTransport};

/// Send-side failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SendError {
    /// At most one goal may be outstanding per broker.
    #[error("a goal is already in flight")]
    GoalInFlight,
}

struct CompletionSlot<A: ActionSpec> {
    notice: Option<CompletionNotice<A>>,
    recorded: bool,
}

struct InboxShared<A: ActionSpec> {
    action: String,
    feedback: FeedbackQueue<A::Feedback>,
    completion: Mutex<CompletionSlot<A>>,
    active: AtomicBool,
    sink: Option<Arc<dyn EventSink>>,
}

/// Callback-side handle into one broker.
///
/// Clonable; the transport keeps one per dispatched goal and drives it
/// from its callback context. Neither call blocks beyond a short lock.
pub struct BrokerInbox<A: ActionSpec> {
    shared: Arc<InboxShared<A>>,
}

impl<A: ActionSpec> Clone for BrokerInbox<A> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<A: ActionSpec> BrokerInbox<A> {
    fn new(action: String, sink: Option<Arc<dyn EventSink>>) -> Self {
        Self {
            shared: Arc::new(InboxShared {
                action,
                feedback: FeedbackQueue::new(),
                completion: Mutex::new(CompletionSlot {
                    notice: None,
                    recorded: false,
                }),
                active: AtomicBool::new(false),
                sink,
            }),
        }
    }

    /// Queue one progress entry, evicting the oldest when full, and nudge
    /// the sink.
    pub fn push_feedback(&self, feedback: A::Feedback) {
        let _ = self.shared.feedback.push(feedback);
        self.notify(BrokerEvent::FeedbackQueued);
    }

    /// Record the terminal completion and clear the goal-active flag.
    ///
    /// One completion is kept per goal; later calls are ignored with a
    /// warning.
    pub fn complete(&self, status: GoalStatus, outcome: A::Outcome) {
        {
            let mut slot = self.shared.completion.lock();
            if slot.recorded {
                warn!("Ignoring duplicate completion for: {}", self.shared.action);
                return;
            }
            slot.recorded = true;
            slot.notice = Some(CompletionNotice { status, outcome });
        }
        self.shared.active.store(false, Ordering::Release);
        self.notify(BrokerEvent::GoalCompleted(status));
    }

    fn notify(&self, event: BrokerEvent) {
        if let Some(sink) = &self.shared.sink {
            sink.notify(event);
        }
    }

    /// Reset the completion slot for a new goal and mark it active.
    fn arm(&self) {
        let mut slot = self.shared.completion.lock();
        if slot.notice.take().is_some() {
            warn!("Discarding unread completion for: {}", self.shared.action);
        }
        slot.recorded = false;
        self.shared.active.store(true, Ordering::Release);
    }
}

/// Consumer-side broker for one action server.
///
/// Expects a single consumer context; only the callback side runs
/// concurrently with it, through the inbox.
pub struct ActionRequestBroker<A: ActionSpec, T: GoalTransport<A>> {
    action: String,
    transport: T,
    inbox: BrokerInbox<A>,
}

impl<A: ActionSpec, T: GoalTransport<A>> ActionRequestBroker<A, T> {
    /// Broker without an event sink.
    pub fn new(action: impl Into<String>, transport: T) -> Self {
        Self::build(action.into(), transport, None)
    }

    /// Broker nudging `sink` from the callback context.
    pub fn with_sink(action: impl Into<String>, transport: T, sink: Arc<dyn EventSink>) -> Self {
        Self::build(action.into(), transport, Some(sink))
    }

    fn build(action: String, transport: T, sink: Option<Arc<dyn EventSink>>) -> Self {
        let inbox = BrokerInbox::new(action.clone(), sink);
        Self {
            action,
            transport,
            inbox,
        }
    }

    /// Dispatch a goal.
    ///
    /// Fails with [`SendError::GoalInFlight`] while a goal is outstanding.
    /// Blocks until the transport reports a reachable server; this is the
    /// broker's only blocking call.
    pub fn send(&self, goal: A::Goal) -> Result<(), SendError> {
        if self.is_goal_active() {
            return Err(SendError::GoalInFlight);
        }

        if !self.transport.is_connected() {
            info!("Waiting for action server for: {}", self.action);
            self.transport.wait_until_connected();
        }

        self.inbox.arm();
        self.transport.dispatch(goal, self.inbox.clone());
        Ok(())
    }

    /// Forward a cancel request for the outstanding goal.
    ///
    /// Cooperative: the active flag stays set until the server terminates
    /// the goal through a completion.
    pub fn cancel(&self) {
        info!("Cancelling goal for: {}", self.action);
        self.transport.cancel();
    }

    /// True from a successful `send` until the completion is recorded.
    pub fn is_goal_active(&self) -> bool {
        self.inbox.shared.active.load(Ordering::Acquire)
    }

    pub fn has_pending_feedback(&self) -> bool {
        !self.inbox.shared.feedback.is_empty()
    }

    /// Drain one progress entry, oldest first.
    pub fn pop_pending_feedback(&self) -> Option<A::Feedback> {
        self.inbox.shared.feedback.pop()
    }

    /// Take the terminal completion. Delivered at most once per goal.
    pub fn pop_pending_completion(&self) -> Option<CompletionNotice<A>> {
        self.inbox.shared.completion.lock().notice.take()
    }
}
