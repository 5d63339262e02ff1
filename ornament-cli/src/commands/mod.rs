pub mod countdown_cmd;
pub mod simulate_cmd;
