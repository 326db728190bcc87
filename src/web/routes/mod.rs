pub mod participants_api;
pub mod roster;
pub mod settings;
