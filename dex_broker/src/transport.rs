//! Transport seam toward the action server.
//!
//! `ActionSpec` names the three payload types of one action definition;
//! `GoalTransport` is the engine-agnostic wire the broker dispatches
//! through. The transport drives the broker's inbox handle from its
//! callback context.

use std::sync::Arc;

use crate::broker::BrokerInbox;

/// Payload types of one action definition.
pub trait ActionSpec: 'static {
    /// What the requester sends.
    type Goal: Send;
    /// Periodic progress payload.
    type Feedback: Send;
    /// Terminal result payload.
    type Outcome: Send;
}

/// Connection to one action server.
pub trait GoalTransport<A: ActionSpec> {
    /// True when the server is reachable.
    fn is_connected(&self) -> bool;

    /// Block until the server is reachable.
    fn wait_until_connected(&self);

    /// Send the goal. Progress and the terminal completion arrive through
    /// `inbox` from the transport's callback context.
    fn dispatch(&self, goal: A::Goal, inbox: BrokerInbox<A>);

    /// Ask the server to cancel the outstanding goal. Cooperative: the
    /// goal still terminates through a completion.
    fn cancel(&self);
}

impl<A: ActionSpec, T: GoalTransport<A>> GoalTransport<A> for Arc<T> {
    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn wait_until_connected(&self) {
        (**self).wait_until_connected()
    }

    fn dispatch(&self, goal: A::Goal, inbox: BrokerInbox<A>) {
        (**self).dispatch(goal, inbox)
    }

    fn cancel(&self) {
        (**self).cancel()
    }
}
