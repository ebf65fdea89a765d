//! Broker events and the sink seam.

use core::fmt;

use crate::transport::ActionSpec;

/// Terminal status of one goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GoalStatus {
    /// Server finished the goal as requested.
    Succeeded = 0,
    /// Server gave up on the goal.
    Aborted = 1,
    /// Goal terminated after a cancel request.
    Cancelled = 2,
    /// Server refused the goal outright.
    Rejected = 3,
}

impl GoalStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Succeeded => "SUCCEEDED",
            Self::Aborted => "ABORTED",
            Self::Cancelled => "CANCELLED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal record of one goal: status plus the outcome payload.
pub struct CompletionNotice<A: ActionSpec> {
    pub status: GoalStatus,
    pub outcome: A::Outcome,
}

/// Wake-up nudge posted from the transport's callback context.
///
/// Carries no payloads; the consumer drains the actual entries through the
/// broker's `pop_*` calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerEvent {
    /// A feedback entry was queued.
    FeedbackQueued,
    /// The outstanding goal terminated.
    GoalCompleted(GoalStatus),
}

/// Receiver of broker events, implemented by the owning engine.
///
/// `notify` runs on the transport's callback context and must not block.
pub trait EventSink: Send + Sync {
    fn notify(&self, event: BrokerEvent);
}
