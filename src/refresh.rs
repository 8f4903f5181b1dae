//! Background refresh scheduling
//!
//! Every widget gets its own tokio task that runs a refresh cycle immediately
//! and then once per poll interval. Widgets are independent: no ordering is
//! kept between their cycles. Completed cycles are reported to the main
//! application over a channel.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Local};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use thiserror::Error;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::cache::WidgetCache;
use crate::cli::DashboardConfig;
use crate::render::{Board, Region, RenderError};
use crate::sources::{news_widget, weather_widget, NEWS_WIDGET_ID};
use crate::store::KvStore;
use crate::widget::{ConfigError, CycleOutcome, RefreshingWidget, Transport};

/// Messages sent from background refresh tasks to the main app
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshMessage {
    /// A widget finished a refresh cycle
    CycleCompleted {
        widget_id: String,
        outcome: CycleOutcome,
        at: DateTime<Local>,
    },
}

/// Whether a scheduler currently has a running timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Active,
}

/// Owns the timer task of a single widget
#[derive(Debug)]
pub struct Scheduler {
    widget_id: String,
    refresh_tx: Option<mpsc::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl Scheduler {
    /// Spawns the widget's refresh task (Idle -> Active)
    ///
    /// The first cycle runs immediately; later cycles follow the widget's poll
    /// interval. A tick that falls behind is delayed rather than replayed.
    pub fn spawn<P>(
        widget: Arc<RefreshingWidget<P>>,
        events: Option<mpsc::Sender<RefreshMessage>>,
    ) -> Self
    where
        P: Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        let widget_id = widget.id().to_string();
        let period = widget.config().poll_interval();
        let (refresh_tx, mut refresh_rx) = mpsc::channel::<()>(1);

        info!(widget = %widget_id, ?period, "starting widget refresh");

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick() => {}
                    request = refresh_rx.recv() => {
                        if request.is_none() {
                            break;
                        }
                        // Manual refresh restarts the period
                        interval.reset();
                    }
                }

                let outcome = widget.run_cycle().await;
                debug!(widget = %widget.id(), ?outcome, "refresh cycle finished");

                if let Some(ref tx) = events {
                    // The app may be slow to drain; never stall the timer for it
                    let _ = tx.try_send(RefreshMessage::CycleCompleted {
                        widget_id: widget.id().to_string(),
                        outcome,
                        at: Local::now(),
                    });
                }
            }
        });

        Self {
            widget_id,
            refresh_tx: Some(refresh_tx),
            task: Some(task),
        }
    }

    pub fn widget_id(&self) -> &str {
        &self.widget_id
    }

    pub fn state(&self) -> SchedulerState {
        match self.task {
            Some(ref task) if !task.is_finished() => SchedulerState::Active,
            _ => SchedulerState::Idle,
        }
    }

    /// Asks for a cycle right now instead of waiting for the next tick
    ///
    /// Returns `false` if the scheduler is stopped. A request made while one is
    /// already pending is merged into it.
    pub fn request_refresh(&self) -> bool {
        match self.refresh_tx {
            Some(ref tx) => !matches!(tx.try_send(()), Err(mpsc::error::TrySendError::Closed(_))),
            None => false,
        }
    }

    /// Clears the timer (Active -> Idle)
    ///
    /// Safe to call at any point, including mid-cycle, and any number of times.
    pub fn stop(&mut self) {
        self.refresh_tx.take();
        if let Some(task) = self.task.take() {
            task.abort();
            info!(widget = %self.widget_id, "stopped widget refresh");
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Registry of per-widget schedulers
#[derive(Debug)]
pub struct Dashboard {
    schedulers: HashMap<String, Scheduler>,
    events_tx: mpsc::Sender<RefreshMessage>,
    /// Channel for receiving refresh messages
    pub receiver: mpsc::Receiver<RefreshMessage>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        let (events_tx, receiver) = mpsc::channel(32);
        Self {
            schedulers: HashMap::new(),
            events_tx,
            receiver,
        }
    }

    /// Starts refreshing `widget`, replacing any scheduler with the same id
    pub fn start<P>(&mut self, widget: Arc<RefreshingWidget<P>>)
    where
        P: Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        let scheduler = Scheduler::spawn(widget, Some(self.events_tx.clone()));
        if let Some(mut previous) = self
            .schedulers
            .insert(scheduler.widget_id().to_string(), scheduler)
        {
            previous.stop();
        }
    }

    pub fn state(&self, widget_id: &str) -> SchedulerState {
        self.schedulers
            .get(widget_id)
            .map(Scheduler::state)
            .unwrap_or(SchedulerState::Idle)
    }

    /// Stops one widget's timer; returns `false` for an unknown id
    pub fn stop(&mut self, widget_id: &str) -> bool {
        match self.schedulers.get_mut(widget_id) {
            Some(scheduler) => {
                scheduler.stop();
                true
            }
            None => false,
        }
    }

    /// Requests an immediate cycle for every running widget
    pub fn refresh_all(&self) {
        for scheduler in self.schedulers.values() {
            scheduler.request_refresh();
        }
    }

    /// Stops every widget's timer
    pub fn shutdown(&mut self) {
        for scheduler in self.schedulers.values_mut() {
            scheduler.stop();
        }
    }
}

/// Checks for pending refresh messages without blocking
///
/// # Returns
/// * `Some(RefreshMessage)` if a message was available
/// * `None` if no messages are pending
pub fn try_recv(dashboard: &mut Dashboard) -> Option<RefreshMessage> {
    dashboard.receiver.try_recv().ok()
}

/// Errors that can occur while wiring widgets at startup
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Wires the configured widgets to the board and starts their schedulers
///
/// Without a news query the news region is mounted as unavailable and no
/// news scheduler is started.
pub fn start_widgets(
    config: &DashboardConfig,
    transport: Arc<dyn Transport>,
    store: Arc<dyn KvStore>,
    board: &Board,
    dashboard: &mut Dashboard,
) -> Result<(), SetupError> {
    let cache = WidgetCache::new(store);

    let weather = RefreshingWidget::new(
        weather_widget(config.latitude, config.longitude, config.weather_interval)?,
        Arc::clone(&transport),
        cache.clone(),
        board.clone(),
    );
    dashboard.start(Arc::new(weather));

    match &config.news {
        Some(query) => {
            let news = RefreshingWidget::new(
                news_widget(query, config.news_interval)?,
                transport,
                cache,
                board.clone(),
            );
            dashboard.start(Arc::new(news));
        }
        None => {
            warn!("no news API key configured, headlines disabled");
            board.mount(NEWS_WIDGET_ID);
            board.replace(NEWS_WIDGET_ID, Region::unavailable())?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::render::Fragment;
    use crate::sources::WEATHER_WIDGET_ID;
    use crate::store::MemoryStore;
    use clap::Parser;
    use crate::widget::{FetchError, Transport, WidgetConfig};
    use async_trait::async_trait;
    use reqwest::Url;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Transport that counts calls and always answers with the call number
    #[derive(Default)]
    struct Counting(AtomicUsize);

    #[async_trait]
    impl Transport for Counting {
        async fn get(&self, _url: &Url) -> Result<String, FetchError> {
            let n = self.0.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(n.to_string())
        }
    }

    fn counting_widget(id: &str, period: Duration) -> (Arc<RefreshingWidget<u64>>, Arc<Counting>) {
        let transport = Arc::new(Counting::default());
        let config = WidgetConfig::new(
            id,
            Url::parse("https://api.example.com/count").unwrap(),
            period,
            Arc::new(|body: &str| {
                body.parse::<u64>()
                    .map_err(|e| FetchError::DecodeFailure(e.to_string()))
            }),
            Arc::new(|n: &u64| Fragment::new().text(n.to_string())),
        )
        .unwrap();
        let widget = RefreshingWidget::new(
            config,
            transport.clone(),
            WidgetCache::new(Arc::new(MemoryStore::new())),
            Board::new(),
        );
        (Arc::new(widget), transport)
    }

    fn completed_id(message: RefreshMessage) -> String {
        match message {
            RefreshMessage::CycleCompleted { widget_id, .. } => widget_id,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_cycle_runs_immediately() {
        let (widget, transport) = counting_widget("weather", Duration::from_secs(60));
        let (tx, mut rx) = mpsc::channel(8);
        let start = tokio::time::Instant::now();

        let _scheduler = Scheduler::spawn(widget, Some(tx));

        let message = rx.recv().await.unwrap();
        assert_eq!(completed_id(message), "weather");
        assert_eq!(transport.0.load(Ordering::SeqCst), 1);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycles_repeat_on_interval() {
        let (widget, transport) = counting_widget("weather", Duration::from_secs(60));
        let (tx, mut rx) = mpsc::channel(8);
        let start = tokio::time::Instant::now();

        let _scheduler = Scheduler::spawn(widget, Some(tx));

        for _ in 0..3 {
            rx.recv().await.unwrap();
        }
        assert_eq!(transport.0.load(Ordering::SeqCst), 3);
        assert!(start.elapsed() >= Duration::from_secs(120));
        assert!(start.elapsed() < Duration::from_secs(180));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent_and_halts_cycles() {
        let (widget, transport) = counting_widget("weather", Duration::from_secs(60));
        let (tx, mut rx) = mpsc::channel(8);

        let mut scheduler = Scheduler::spawn(widget, Some(tx));
        rx.recv().await.unwrap();
        assert_eq!(scheduler.state(), SchedulerState::Active);

        scheduler.stop();
        scheduler.stop();
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert!(!scheduler.request_refresh());

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(transport.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_refresh_runs_cycle_early() {
        let (widget, transport) = counting_widget("news", Duration::from_secs(3600));
        let (tx, mut rx) = mpsc::channel(8);
        let start = tokio::time::Instant::now();

        let scheduler = Scheduler::spawn(widget, Some(tx));
        rx.recv().await.unwrap();

        assert!(scheduler.request_refresh());
        rx.recv().await.unwrap();

        assert_eq!(transport.0.load(Ordering::SeqCst), 2);
        assert!(start.elapsed() < Duration::from_secs(3600));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dashboard_stop_by_widget_id() {
        let mut dashboard = Dashboard::new();
        let (weather, weather_calls) = counting_widget("weather", Duration::from_secs(60));
        let (news, news_calls) = counting_widget("news", Duration::from_secs(60));

        dashboard.start(weather);
        dashboard.start(news);

        // Both first cycles
        dashboard.receiver.recv().await.unwrap();
        dashboard.receiver.recv().await.unwrap();

        assert!(dashboard.stop("weather"));
        assert!(dashboard.stop("weather"));
        assert!(!dashboard.stop("unknown"));
        assert_eq!(dashboard.state("weather"), SchedulerState::Idle);
        assert_eq!(dashboard.state("news"), SchedulerState::Active);

        let message = dashboard.receiver.recv().await.unwrap();
        assert_eq!(completed_id(message), "news");
        assert_eq!(weather_calls.0.load(Ordering::SeqCst), 1);
        assert_eq!(news_calls.0.load(Ordering::SeqCst), 2);

        dashboard.shutdown();
        assert_eq!(dashboard.state("news"), SchedulerState::Idle);
    }

    #[tokio::test]
    async fn test_try_recv_empty_dashboard() {
        let mut dashboard = Dashboard::new();
        assert!(try_recv(&mut dashboard).is_none());
        assert_eq!(dashboard.state("weather"), SchedulerState::Idle);
    }

    fn dashboard_config(args: &[&str]) -> DashboardConfig {
        let mut argv = vec!["widgetdash"];
        argv.extend_from_slice(args);
        DashboardConfig::from_cli(&Cli::parse_from(argv)).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_widgets_without_news_key() {
        let config = dashboard_config(&["--news-api-key", ""]);
        let board = Board::new();
        let mut dashboard = Dashboard::new();

        start_widgets(
            &config,
            Arc::new(Counting::default()),
            Arc::new(MemoryStore::new()),
            &board,
            &mut dashboard,
        )
        .unwrap();

        assert_eq!(board.region(NEWS_WIDGET_ID), Some(Region::unavailable()));
        assert_eq!(dashboard.state(NEWS_WIDGET_ID), SchedulerState::Idle);
        assert_eq!(dashboard.state(WEATHER_WIDGET_ID), SchedulerState::Active);
        dashboard.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_widgets_with_news_key() {
        let config = dashboard_config(&["--news-api-key", "key123"]);
        let board = Board::new();
        let mut dashboard = Dashboard::new();

        start_widgets(
            &config,
            Arc::new(Counting::default()),
            Arc::new(MemoryStore::new()),
            &board,
            &mut dashboard,
        )
        .unwrap();

        assert_eq!(dashboard.state(NEWS_WIDGET_ID), SchedulerState::Active);
        assert_eq!(dashboard.state(WEATHER_WIDGET_ID), SchedulerState::Active);
        dashboard.shutdown();
        assert_eq!(dashboard.state(NEWS_WIDGET_ID), SchedulerState::Idle);
    }
}
