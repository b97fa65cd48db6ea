pub mod config;
pub mod feed;
pub mod format;
pub mod menu;
pub mod output;
pub mod pipeline;
pub mod week;
