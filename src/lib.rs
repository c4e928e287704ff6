pub mod config;
pub mod data;
pub mod pager;
pub mod prompt;
pub mod report;
pub mod session;
pub mod stats;
