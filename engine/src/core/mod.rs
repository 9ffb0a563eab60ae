pub mod log;
pub mod tasks;
