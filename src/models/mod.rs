pub mod claim;
pub mod exit_code;
pub mod settings;
pub mod ui_event;
pub mod verdict;
