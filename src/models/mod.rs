pub mod log_event;
pub mod qa;
