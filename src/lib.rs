pub mod context;
pub mod engine;
pub mod match_log;
pub mod referee;
pub mod simulate;
pub mod stats_feed;
pub mod tactics;
pub mod team_form;
