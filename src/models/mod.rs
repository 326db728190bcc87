pub mod participants;

pub use participants::{ParticipantDto, ParticipantRow, ParticipantStatus};
