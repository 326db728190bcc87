pub mod participant_service;
pub mod roster_view_service;
