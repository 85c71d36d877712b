mod aggregator;

pub use aggregator::{AggregatedParticipant, LiveParticipant, RosterAggregator, RosterCallback};
