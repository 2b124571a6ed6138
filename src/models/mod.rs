//! Grouping domain models.
//!
//! Provides the read-only inputs (`Participant`, `Session`) and the
//! solution type (`Assignment`) shared by every assigner.
//!
//! # Domain Mappings
//!
//! | u-group | Research retreat | Workshop | Classroom |
//! |---------|------------------|----------|-----------|
//! | Participant | Researcher | Attendee | Student |
//! | Rank | Faculty/PhD/MSc/BSc | Seniority | Grade |
//! | Affiliation | Lab | Company | Homeroom |
//! | Session | Discussion round | Breakout | Project cycle |

mod assignment;
mod participant;
mod session;

pub use assignment::Assignment;
pub use participant::{Participant, Rank, RankCounts};
pub use session::Session;
