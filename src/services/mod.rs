pub mod analytics_service;
pub mod change_feed;
pub mod live_sync;
pub mod order_service;
pub mod product_service;
pub mod qr_service;
pub mod table_service;
pub mod waiter_call_service;

pub use analytics_service::AnalyticsService;
pub use change_feed::*;
pub use live_sync::*;
pub use order_service::*;
pub use product_service::*;
pub use qr_service::*;
pub use table_service::*;
pub use waiter_call_service::*;

use crate::config::Config;
use sea_orm::DatabaseConnection;

/// Every service the HTTP layer needs, wired over one pool and one change feed.
#[derive(Clone)]
pub struct AppServices {
    pub feed: ChangeFeed,
    pub products: ProductService,
    pub orders: OrderService,
    pub waiter_calls: WaiterCallService,
    pub analytics: AnalyticsService,
    pub qr: QrService,
    pub tables: TableService,
    pub live: LiveSyncService,
}

impl AppServices {
    pub fn new(pool: DatabaseConnection, config: &Config) -> Self {
        let restaurant = &config.restaurant;
        let feed = ChangeFeed::new(config.live.channel_capacity);
        let products = ProductService::new(pool.clone(), restaurant.name.clone());
        let orders = OrderService::new(pool.clone(), products.clone(), feed.clone());
        let waiter_calls = WaiterCallService::new(pool, feed.clone());
        let analytics = AnalyticsService::new(orders.clone(), waiter_calls.clone());
        let qr = QrService::new(restaurant.public_base_url.clone());
        let tables = TableService::new(
            orders.clone(),
            qr.clone(),
            restaurant.name.clone(),
            restaurant.table_count,
        );
        let live = LiveSyncService::new(feed.clone(), config.live.clone());

        Self {
            feed,
            products,
            orders,
            waiter_calls,
            analytics,
            qr,
            tables,
            live,
        }
    }
}
