mod client;
mod types;

pub use client::AdminApiClient;
pub use types::{RoomsSnapshot, RtcTokenGrant, StreamEvent};
