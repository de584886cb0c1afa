pub mod app_state;
pub mod config;
pub mod errors;
pub mod extract;
pub mod player_status;
pub mod startup;
