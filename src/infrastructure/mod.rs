pub mod console_log;
pub mod simulated;
