pub mod commands;
pub mod datetime_utils;
pub mod error_utils;
pub mod filename_utils;
pub mod output;
pub mod twitter;
