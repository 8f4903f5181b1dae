//! widgetdash Library
//!
//! Self-refreshing dashboard widgets with stale-while-revalidate caching,
//! plus the terminal UI that displays them.

pub mod app;
pub mod cache;
pub mod cli;
pub mod logging;
pub mod refresh;
pub mod render;
pub mod sources;
pub mod store;
pub mod theme;
pub mod ui;
pub mod widget;
