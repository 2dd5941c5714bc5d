pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod github;
pub mod job;
pub mod page;
pub mod sink;
