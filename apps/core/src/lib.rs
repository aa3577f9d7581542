pub mod clipboard;
pub mod config;
pub mod history_store;
pub mod hotkey;
pub mod logging;
pub mod popup_state;
pub mod query_dsl;
pub mod runtime;
pub mod search;
pub mod session;
