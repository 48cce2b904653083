/// Session module - Gateway

mod controller;
mod timeline;

pub use controller::{
    FailureKind, PendingRequest, RejectReason, SessionController, SessionPhase, SubmitOutcome,
};
pub use timeline::{Message, MessageId, Role, Timeline, TimelineEvent};
