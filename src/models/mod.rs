pub mod activity;
pub mod event;
pub mod summary;

pub use activity::{Activity, FitnessSnapshot, WellnessDay};
pub use event::{EventPayload, RemoteEvent};
pub use summary::{Compliance, WeekSummary};
