mod manager;

pub use manager::{ReconcileOutcome, SessionPoolManager};
