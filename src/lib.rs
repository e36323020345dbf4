// Library for tests to access modules

pub mod aggregator;
pub mod cli;
pub mod commands;
pub mod config;
pub mod deriver;
pub mod format;
pub mod fridge_state;
pub mod history_log;
pub mod history_repo;
pub mod models;
pub mod parser;
pub mod routes;
pub mod store;
pub mod version;
pub mod watcher;
pub mod worker;
