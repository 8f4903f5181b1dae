//! Application state management for widgetdash
//!
//! This module contains the UI state of the dashboard: theme, sidebar,
//! navigation, the news ticker position, and the latest refresh results
//! reported by the widget schedulers.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use std::collections::HashMap;
use std::sync::Arc;

use crate::refresh::RefreshMessage;
use crate::render::Board;
use crate::store::KvStore;
use crate::theme::Theme;
use crate::widget::CycleOutcome;

/// Terminal width at or below which choosing a sidebar entry collapses the sidebar
pub const NARROW_WIDTH: u16 = 92;

/// Entries of the sidebar navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavItem {
    Dashboard,
    Weather,
    News,
}

impl NavItem {
    pub const ALL: [NavItem; 3] = [NavItem::Dashboard, NavItem::Weather, NavItem::News];

    pub fn label(&self) -> &'static str {
        match self {
            NavItem::Dashboard => "Dashboard",
            NavItem::Weather => "Weather",
            NavItem::News => "News",
        }
    }
}

/// Result of the most recent cycle of one widget
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LastRefresh {
    pub outcome: CycleOutcome,
    pub at: DateTime<Local>,
}

/// Main application struct managing UI state
pub struct App {
    /// Current light/dark theme
    pub theme: Theme,
    /// Whether the sidebar is expanded
    pub sidebar_open: bool,
    /// Index of the active sidebar entry
    pub nav_index: usize,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag indicating an immediate refresh has been requested
    pub refresh_requested: bool,
    /// Scroll position of the news ticker, in characters
    pub ticker_offset: usize,
    /// Last terminal width seen by the event loop
    pub terminal_width: u16,
    /// Latest cycle results keyed by widget id
    pub last_refresh: HashMap<String, LastRefresh>,
    /// Regions rendered by the widgets
    pub board: Board,
    /// Persistent store for preferences
    store: Arc<dyn KvStore>,
}

impl App {
    /// Creates the app, restoring the saved theme from `store`
    pub fn new(board: Board, store: Arc<dyn KvStore>) -> Self {
        let theme = Theme::load(store.as_ref());
        Self {
            theme,
            sidebar_open: true,
            nav_index: 0,
            show_help: false,
            should_quit: false,
            refresh_requested: false,
            ticker_offset: 0,
            terminal_width: u16::MAX,
            last_refresh: HashMap::new(),
            board,
            store,
        }
    }

    /// Currently active sidebar entry
    pub fn active_nav(&self) -> NavItem {
        NavItem::ALL[self.nav_index.min(NavItem::ALL.len() - 1)]
    }

    /// Switches theme and persists the choice
    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.theme.save(self.store.as_ref());
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    /// Makes the highlighted entry active; collapses the sidebar on narrow terminals
    pub fn select_nav(&mut self, index: usize) {
        if index < NavItem::ALL.len() {
            self.nav_index = index;
        }
        if self.terminal_width <= NARROW_WIDTH {
            self.sidebar_open = false;
        }
    }

    fn move_nav_up(&mut self) {
        if self.nav_index > 0 {
            self.nav_index -= 1;
        }
    }

    fn move_nav_down(&mut self) {
        if self.nav_index + 1 < NavItem::ALL.len() {
            self.nav_index += 1;
        }
    }

    /// Advances the ticker by one column
    pub fn tick(&mut self) {
        self.ticker_offset = self.ticker_offset.wrapping_add(1);
    }

    /// Records a completed refresh cycle
    pub fn apply_refresh_message(&mut self, message: RefreshMessage) {
        match message {
            RefreshMessage::CycleCompleted {
                widget_id,
                outcome,
                at,
            } => {
                self.last_refresh.insert(widget_id, LastRefresh { outcome, at });
            }
        }
    }

    /// Handles keyboard input
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Help overlay intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('t') => {
                self.toggle_theme();
            }
            KeyCode::Char('m') => {
                self.toggle_sidebar();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_nav_up();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_nav_down();
            }
            KeyCode::Enter => {
                self.select_nav(self.nav_index);
            }
            KeyCode::Char('1') => self.select_nav(0),
            KeyCode::Char('2') => self.select_nav(1),
            KeyCode::Char('3') => self.select_nav(2),
            KeyCode::Char('r') => {
                self.refresh_requested = true;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            _ => {}
        }
    }
}
