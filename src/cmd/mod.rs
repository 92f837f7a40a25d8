pub mod config_cmd;
pub mod filter;
pub mod match_cmd;
