// Library surface for the binary, headless integration tests and reuse.
// Terminal setup and CLI parsing stay in main.rs.
pub mod app;
pub mod app_dirs;
pub mod celebration;
pub mod challenge;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod input;
pub mod notifier;
pub mod runtime;
pub mod session;
pub mod store;
pub mod text;
pub mod theme;
pub mod time_series;
pub mod typing_policy;
pub mod ui;
pub mod util;
