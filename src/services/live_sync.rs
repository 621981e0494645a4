//! Live order / waiter-call subscriptions.
//!
//! Each subscriber gets its own task that re-fetches the list on a poll timer
//! and whenever the [`ChangeFeed`] reports a write to the same table. Both
//! triggers run the same fetch-and-replace step; [`SnapshotTracker`] drops
//! results identical to the last one sent and derives staff notifications.
//!
//! The feed is best effort. A lagged receiver just causes a refresh, a closed
//! one leaves the subscription on polling alone.

use crate::config::LiveConfig;
use crate::entities::{OrderStatus, PaymentStatus, WaiterCallStatus};
use crate::error::AppResult;
use crate::models::*;
use crate::services::analytics_service::{summarize_calls, summarize_orders};
use crate::services::change_feed::{ChangeEvent, ChangeFeed, FeedTable};
use crate::services::{OrderService, WaiterCallService};
use crate::utils::format_usd;
use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use uuid::Uuid;

const SUBSCRIBER_BUFFER: usize = 32;

/// Remembered ids beyond this are pruned to the ones still listed.
pub const SEEN_LIMIT: usize = 2048;

/// A row of a live list.
pub trait LiveRecord: Clone + PartialEq + Serialize + Send + Sync + 'static {
    type Summary: Serialize + Clone + Send + Sync + 'static;

    fn record_id(&self) -> i64;

    fn summarize(records: &[Self]) -> Self::Summary;

    /// `previous` is `None` the first time a record id is seen.
    fn detect(previous: Option<&Self>, current: &Self) -> Option<LiveNotification>;
}

impl LiveRecord for OrderResponse {
    type Summary = OrderSummary;

    fn record_id(&self) -> i64 {
        self.id
    }

    fn summarize(records: &[Self]) -> OrderSummary {
        summarize_orders(records, Utc::now().date_naive())
    }

    fn detect(previous: Option<&Self>, current: &Self) -> Option<LiveNotification> {
        match previous {
            None if current.status == OrderStatus::Pending
                && current.payment_status == PaymentStatus::Unpaid =>
            {
                Some(LiveNotification::NewOrder {
                    order_id: current.id,
                    table_id: current.table_id.clone(),
                    item_count: current.item_count(),
                    total_cents: current.total_cents,
                    formatted_total: format_usd(current.total_cents),
                })
            }
            Some(prev) if prev.status != current.status => {
                Some(LiveNotification::OrderStatusChanged {
                    order_id: current.id,
                    table_id: current.table_id.clone(),
                    previous: prev.status,
                    current: current.status,
                })
            }
            _ => None,
        }
    }
}

impl LiveRecord for WaiterCallResponse {
    type Summary = WaiterCallSummary;

    fn record_id(&self) -> i64 {
        self.id
    }

    fn summarize(records: &[Self]) -> WaiterCallSummary {
        summarize_calls(records)
    }

    fn detect(previous: Option<&Self>, current: &Self) -> Option<LiveNotification> {
        if previous.is_none() && current.status == WaiterCallStatus::Pending {
            return Some(LiveNotification::WaiterCalled {
                call_id: current.id,
                table_id: current.table_id.clone(),
                created_at: current.created_at,
            });
        }
        None
    }
}

/// Where a subscription re-fetches its list from.
#[async_trait]
pub trait SnapshotSource: Send + Sync + 'static {
    type Record: LiveRecord;

    fn feed_table(&self) -> FeedTable;

    async fn fetch(&self) -> AppResult<Vec<Self::Record>>;
}

pub struct OrderSnapshotSource {
    pub service: OrderService,
    pub filter: OrderFilter,
}

#[async_trait]
impl SnapshotSource for OrderSnapshotSource {
    type Record = OrderResponse;

    fn feed_table(&self) -> FeedTable {
        FeedTable::Orders
    }

    async fn fetch(&self) -> AppResult<Vec<OrderResponse>> {
        self.service.list_orders(&self.filter).await
    }
}

pub struct WaiterCallSnapshotSource {
    pub service: WaiterCallService,
    pub filter: WaiterCallFilter,
}

#[async_trait]
impl SnapshotSource for WaiterCallSnapshotSource {
    type Record = WaiterCallResponse;

    fn feed_table(&self) -> FeedTable {
        FeedTable::WaiterCalls
    }

    async fn fetch(&self) -> AppResult<Vec<WaiterCallResponse>> {
        self.service.list_calls(&self.filter).await
    }
}

#[derive(Debug, Default)]
pub struct Observation {
    pub changed: bool,
    pub notifications: Vec<LiveNotification>,
}

/// Remembers the last emitted list and the records seen so far.
/// The first observation only primes the state and never notifies.
pub struct SnapshotTracker<T> {
    seen: HashMap<i64, T>,
    last: Option<Vec<T>>,
    limit: usize,
}

impl<T: LiveRecord> Default for SnapshotTracker<T> {
    fn default() -> Self {
        Self::with_limit(SEEN_LIMIT)
    }
}

impl<T: LiveRecord> SnapshotTracker<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Once more than `limit` ids are remembered, ids missing from the
    /// current list are forgotten.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            seen: HashMap::new(),
            last: None,
            limit,
        }
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    pub fn observe(&mut self, records: &[T]) -> Observation {
        let initial = self.last.is_none();
        let mut notifications = Vec::new();

        for record in records {
            let id = record.record_id();
            if !initial {
                if let Some(note) = T::detect(self.seen.get(&id), record) {
                    notifications.push(note);
                }
            }
            self.seen.insert(id, record.clone());
        }
        if self.seen.len() > self.limit {
            let listed: HashSet<i64> = records.iter().map(T::record_id).collect();
            self.seen.retain(|id, _| listed.contains(id));
        }

        let changed = self.last.as_deref() != Some(records);
        if changed {
            self.last = Some(records.to_vec());
        }
        Observation {
            changed,
            notifications,
        }
    }
}

pub type LiveMessage<T> = LiveUpdate<T, <T as LiveRecord>::Summary>;

/// Handle to a running subscription; dropping it stops the task.
pub struct LiveSubscription<T: LiveRecord> {
    id: Uuid,
    rx: mpsc::Receiver<LiveMessage<T>>,
    handle: JoinHandle<()>,
}

impl<T: LiveRecord> LiveSubscription<T> {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn recv(&mut self) -> Option<LiveMessage<T>> {
        self.rx.recv().await
    }
}

impl<T: LiveRecord> Drop for LiveSubscription<T> {
    fn drop(&mut self) {
        self.handle.abort();
        log::debug!("Live subscription {} closed", self.id);
    }
}

#[derive(Debug, Clone, Copy)]
struct SyncSettings {
    poll_interval: Duration,
    min_push_gap: Duration,
    heartbeat: Duration,
}

impl From<&LiveConfig> for SyncSettings {
    fn from(config: &LiveConfig) -> Self {
        Self {
            poll_interval: Duration::from_millis(config.poll_interval_ms.max(1)),
            min_push_gap: Duration::from_millis(
                1000 / u64::from(config.events_per_second.max(1)),
            ),
            heartbeat: Duration::from_secs(config.heartbeat_secs.max(1)),
        }
    }
}

#[derive(Clone)]
pub struct LiveSyncService {
    feed: ChangeFeed,
    config: LiveConfig,
}

impl LiveSyncService {
    pub fn new(feed: ChangeFeed, config: LiveConfig) -> Self {
        Self { feed, config }
    }

    pub fn subscribe<S: SnapshotSource>(&self, source: S) -> LiveSubscription<S::Record> {
        spawn_subscription(
            source,
            Some(self.feed.subscribe()),
            SyncSettings::from(&self.config),
        )
    }
}

fn spawn_subscription<S: SnapshotSource>(
    source: S,
    feed_rx: Option<broadcast::Receiver<ChangeEvent>>,
    settings: SyncSettings,
) -> LiveSubscription<S::Record> {
    let id = Uuid::new_v4();
    let (tx, rx) = mpsc::channel(SUBSCRIBER_BUFFER);
    let handle = tokio::spawn(run_sync(id, source, feed_rx, tx, settings));
    LiveSubscription { id, rx, handle }
}

async fn run_sync<S: SnapshotSource>(
    id: Uuid,
    source: S,
    mut feed_rx: Option<broadcast::Receiver<ChangeEvent>>,
    tx: mpsc::Sender<LiveMessage<S::Record>>,
    settings: SyncSettings,
) {
    let table = source.feed_table();
    let mut tracker = SnapshotTracker::<S::Record>::new();
    // first tick completes immediately: that is the initial load
    let mut ticker = tokio::time::interval(settings.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_push_refresh: Option<Instant> = None;
    let mut last_sent = Instant::now();

    log::info!("Live subscription {id} started for {table:?}");

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = next_push(&mut feed_rx, table) => {
                if let Some(previous) = last_push_refresh {
                    let elapsed = previous.elapsed();
                    if elapsed < settings.min_push_gap {
                        tokio::time::sleep(settings.min_push_gap - elapsed).await;
                    }
                }
                drain_pending(&mut feed_rx);
                last_push_refresh = Some(Instant::now());
            }
        }

        if tx.is_closed() {
            break;
        }

        let records = match source.fetch().await {
            Ok(records) => records,
            Err(e) => {
                log::warn!("Live subscription {id} refresh failed, retrying on next trigger: {e}");
                continue;
            }
        };

        let observation = tracker.observe(&records);
        let mut outgoing: Vec<LiveMessage<S::Record>> = Vec::new();
        if observation.changed {
            outgoing.push(LiveUpdate::Snapshot {
                summary: <S::Record as LiveRecord>::summarize(&records),
                records,
                at: Utc::now(),
            });
        } else if last_sent.elapsed() >= settings.heartbeat {
            outgoing.push(LiveUpdate::Heartbeat { at: Utc::now() });
        }
        outgoing.extend(
            observation
                .notifications
                .into_iter()
                .map(LiveUpdate::Notification),
        );

        for update in outgoing {
            if tx.send(update).await.is_err() {
                log::info!("Live subscription {id} receiver gone, stopping");
                return;
            }
            last_sent = Instant::now();
        }
    }

    log::info!("Live subscription {id} stopped");
}

/// Resolves on the next event for `table`. Never resolves once the feed is closed.
async fn next_push(rx: &mut Option<broadcast::Receiver<ChangeEvent>>, table: FeedTable) {
    loop {
        let Some(inner) = rx.as_mut() else {
            return std::future::pending().await;
        };
        match inner.recv().await {
            Ok(event) if event.table == table => return,
            Ok(_) => continue,
            Err(RecvError::Lagged(skipped)) => {
                log::debug!("Change feed lagged by {skipped} events, refreshing");
                return;
            }
            Err(RecvError::Closed) => {
                log::warn!("Change feed closed, continuing with polling only");
                *rx = None;
            }
        }
    }
}

/// Coalesces a burst of queued events into the refresh already scheduled.
fn drain_pending(rx: &mut Option<broadcast::Receiver<ChangeEvent>>) {
    let Some(inner) = rx.as_mut() else {
        return;
    };
    loop {
        match inner.try_recv() {
            Ok(_) | Err(TryRecvError::Lagged(_)) => continue,
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
}
