pub mod config;
pub mod init;
pub mod spec;
pub mod task;
