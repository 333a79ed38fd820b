pub mod trial;
pub mod turtle;

pub use trial::{Outcome, TrialRunner, TrialSummary};
