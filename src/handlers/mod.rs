pub mod common;
pub mod coupons;
pub mod health;

use crate::{db::DbPool, events::EventSender, services::coupons::CouponService};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub coupons: Arc<CouponService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            coupons: Arc::new(CouponService::new(db_pool, event_sender)),
        }
    }
}
