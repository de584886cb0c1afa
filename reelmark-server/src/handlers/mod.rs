pub mod player_status;
