pub mod app;
pub mod backend;
pub mod cli;
pub mod logging;
pub mod realm;
pub mod settings;
pub mod theme;
pub mod ui;
