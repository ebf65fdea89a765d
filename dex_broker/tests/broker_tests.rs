//! Broker integration tests.
//!
//! Verifies:
//! 1. `send` blocks on a late-connecting transport, then dispatches.
//! 2. A callback thread feeds progress and completion to the consumer.
//! 3. Overflow keeps the newest feedback entries.
//! 4. Cancel is cooperative and the goal still terminates via completion.
//! 5. The goal lifecycle rejects overlap and resets after completion.
//! 6. An event sink sees every nudge from the callback context.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use dex_broker::{
    ActionRequestBroker, ActionSpec, BrokerEvent, BrokerInbox, EventSink, FEEDBACK_QUEUE_DEPTH,
    GoalStatus, GoalTransport, SendError,
};
use parking_lot::Mutex;

/// Gripper pinch action: goal is the target width in millimetres, feedback
/// the current width, outcome whether the target was reached.
struct PinchAction;

impl ActionSpec for PinchAction {
    type Goal = f64;
    type Feedback = f64;
    type Outcome = bool;
}

/// Transport stand-in driven directly by the tests.
#[derive(Default)]
struct ManualTransport {
    connected: AtomicBool,
    cancelled: AtomicBool,
    dispatched: Mutex<Vec<f64>>,
    captured: Mutex<Option<BrokerInbox<PinchAction>>>,
}

impl ManualTransport {
    fn connected() -> Arc<Self> {
        let transport = Arc::new(Self::default());
        transport.connected.store(true, Ordering::Release);
        transport
    }

    /// Inbox handle of the most recently dispatched goal.
    fn inbox(&self) -> BrokerInbox<PinchAction> {
        self.captured.lock().clone().expect("no goal dispatched")
    }
}

impl GoalTransport<PinchAction> for ManualTransport {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    fn wait_until_connected(&self) {
        while !self.is_connected() {
            thread::sleep(Duration::from_millis(1));
        }
    }

    fn dispatch(&self, goal: f64, inbox: BrokerInbox<PinchAction>) {
        self.dispatched.lock().push(goal);
        *self.captured.lock() = Some(inbox);
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

#[derive(Default)]
struct RecordingSink(Mutex<Vec<BrokerEvent>>);

impl EventSink for RecordingSink {
    fn notify(&self, event: BrokerEvent) {
        self.0.lock().push(event);
    }
}

#[test]
fn test_send_blocks_until_server_connects() {
    let transport = Arc::new(ManualTransport::default());
    let broker: ActionRequestBroker<PinchAction, _> =
        ActionRequestBroker::new("pinch", transport.clone());

    let flipper = {
        let transport = transport.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(60));
            transport.connected.store(true, Ordering::Release);
        })
    };

    let start = Instant::now();
    broker.send(42.0).expect("send succeeds once connected");
    assert!(start.elapsed() >= Duration::from_millis(50));
    assert!(broker.is_goal_active());
    assert_eq!(*transport.dispatched.lock(), vec![42.0]);

    flipper.join().expect("flipper thread panicked");
}

#[test]
fn test_callback_thread_drives_feedback_and_completion() {
    let transport = ManualTransport::connected();
    let broker: ActionRequestBroker<PinchAction, _> =
        ActionRequestBroker::new("pinch", transport.clone());
    broker.send(10.0).expect("send");

    let inbox = transport.inbox();
    let worker = thread::spawn(move || {
        for width in [30.0, 20.0, 10.0] {
            inbox.push_feedback(width);
        }
        inbox.complete(GoalStatus::Succeeded, true);
    });
    worker.join().expect("worker thread panicked");

    assert!(broker.has_pending_feedback());
    assert_eq!(broker.pop_pending_feedback(), Some(30.0));
    assert_eq!(broker.pop_pending_feedback(), Some(20.0));
    assert_eq!(broker.pop_pending_feedback(), Some(10.0));
    assert_eq!(broker.pop_pending_feedback(), None);
    assert!(!broker.has_pending_feedback());

    assert!(!broker.is_goal_active());
    let notice = broker.pop_pending_completion().expect("completion pending");
    assert_eq!(notice.status, GoalStatus::Succeeded);
    assert!(notice.outcome);
    assert!(broker.pop_pending_completion().is_none());
}

#[test]
fn test_feedback_overflow_keeps_newest() {
    let transport = ManualTransport::connected();
    let broker: ActionRequestBroker<PinchAction, _> =
        ActionRequestBroker::new("pinch", transport.clone());
    broker.send(0.0).expect("send");

    let inbox = transport.inbox();
    for n in 0..15 {
        inbox.push_feedback(f64::from(n));
    }

    let drained: Vec<f64> = std::iter::from_fn(|| broker.pop_pending_feedback()).collect();
    let expected: Vec<f64> = (5..15).map(f64::from).collect();
    assert_eq!(drained.len(), FEEDBACK_QUEUE_DEPTH);
    assert_eq!(drained, expected);
}

#[test]
fn test_cancel_is_cooperative() {
    let transport = ManualTransport::connected();
    let broker: ActionRequestBroker<PinchAction, _> =
        ActionRequestBroker::new("pinch", transport.clone());
    broker.send(25.0).expect("send");

    broker.cancel();
    assert!(transport.cancelled.load(Ordering::Acquire));
    // Still outstanding until the server terminates the goal.
    assert!(broker.is_goal_active());

    transport.inbox().complete(GoalStatus::Cancelled, false);
    assert!(!broker.is_goal_active());
    let notice = broker.pop_pending_completion().expect("completion pending");
    assert_eq!(notice.status, GoalStatus::Cancelled);
    assert!(!notice.outcome);
}

#[test]
fn test_goal_lifecycle_resets_after_completion() {
    let transport = ManualTransport::connected();
    let broker: ActionRequestBroker<PinchAction, _> =
        ActionRequestBroker::new("pinch", transport.clone());

    broker.send(1.0).expect("first send");
    assert_eq!(broker.send(2.0), Err(SendError::GoalInFlight));

    transport.inbox().complete(GoalStatus::Aborted, false);
    assert!(!broker.is_goal_active());
    let notice = broker.pop_pending_completion().expect("completion pending");
    assert_eq!(notice.status, GoalStatus::Aborted);

    broker.send(2.0).expect("idle broker accepts a new goal");
    assert_eq!(*transport.dispatched.lock(), vec![1.0, 2.0]);
}

#[test]
fn test_unread_completion_is_discarded_by_next_send() {
    let transport = ManualTransport::connected();
    let broker: ActionRequestBroker<PinchAction, _> =
        ActionRequestBroker::new("pinch", transport.clone());

    broker.send(1.0).expect("first send");
    transport.inbox().complete(GoalStatus::Succeeded, true);

    // Consumer never drained the first completion.
    broker.send(2.0).expect("second send");
    assert!(broker.pop_pending_completion().is_none());

    transport.inbox().complete(GoalStatus::Aborted, false);
    let notice = broker.pop_pending_completion().expect("completion pending");
    assert_eq!(notice.status, GoalStatus::Aborted);
}

#[test]
fn test_duplicate_completion_keeps_the_first() {
    let transport = ManualTransport::connected();
    let broker: ActionRequestBroker<PinchAction, _> =
        ActionRequestBroker::new("pinch", transport.clone());
    broker.send(5.0).expect("send");

    let inbox = transport.inbox();
    inbox.complete(GoalStatus::Succeeded, true);
    inbox.complete(GoalStatus::Aborted, false);

    let notice = broker.pop_pending_completion().expect("completion pending");
    assert_eq!(notice.status, GoalStatus::Succeeded);
    assert!(notice.outcome);
    assert!(broker.pop_pending_completion().is_none());
}

#[test]
fn test_sink_receives_events_from_callback_thread() {
    let sink = Arc::new(RecordingSink::default());
    let transport = ManualTransport::connected();
    let broker: ActionRequestBroker<PinchAction, _> =
        ActionRequestBroker::with_sink("pinch", transport.clone(), sink.clone());
    broker.send(5.0).expect("send");

    let inbox = transport.inbox();
    let worker = thread::spawn(move || {
        inbox.push_feedback(12.0);
        inbox.push_feedback(8.0);
        inbox.complete(GoalStatus::Succeeded, true);
    });
    worker.join().expect("worker thread panicked");

    assert_eq!(
        *sink.0.lock(),
        vec![
            BrokerEvent::FeedbackQueued,
            BrokerEvent::FeedbackQueued,
            BrokerEvent::GoalCompleted(GoalStatus::Succeeded),
        ]
    );
}
