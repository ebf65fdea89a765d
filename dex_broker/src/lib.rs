//! DEX Action Broker
//!
//! Bounded, engine-agnostic bridge between a consumer that issues
//! long-running action goals and the transport that talks to the action
//! server. At most one goal is outstanding per broker; progress feedback
//! lands in a fixed-depth drop-oldest queue and the terminal completion is
//! delivered exactly once. An optional event sink receives wake-up nudges
//! from the transport's callback context.
//!
//! # Module Structure
//!
//! - [`broker`] - Consumer-side broker and the callback-side inbox
//! - [`event`] - Goal status, completion notice, event sink seam
//! - [`queue`] - Fixed-depth drop-oldest feedback queue
//! - [`transport`] - Action typing and the goal transport seam
//!
//! The consumer side never blocks except inside [`ActionRequestBroker::send`]
//! while the server is unreachable.

pub mod broker;
pub mod event;
pub mod queue;
pub mod transport;

pub use broker::{ActionRequestBroker, BrokerInbox, SendError};
pub use event::{BrokerEvent, CompletionNotice, EventSink, GoalStatus};
pub use queue::{FEEDBACK_QUEUE_DEPTH, FeedbackQueue};
pub use transport::{ActionSpec, GoalTransport};
