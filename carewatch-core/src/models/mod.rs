mod operator;
mod participant;
mod room;
mod session;

pub use operator::OperatorIdentity;
pub use participant::{
    classify_identity, IdentityClass, ParticipantDescriptor, AUTOMATED_IDENTITY_PREFIX,
    OPERATOR_IDENTITY_PREFIX,
};
pub use room::RoomDescriptor;
pub use session::SessionConnection;
