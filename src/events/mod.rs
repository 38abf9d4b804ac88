use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Domain events published by the coupon service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    CouponCreated {
        coupon_id: Uuid,
        code: String,
    },
    CouponUpdated(Uuid),
    CouponDeleted(Uuid),
    CouponRedeemed {
        coupon_id: Uuid,
        usage_id: Uuid,
        discount: Decimal,
        order_id: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging instead of failing when the channel is closed.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            warn!(error = %e, "Dropping event; processor is not running");
        }
    }
}

/// Consumes events until every sender is dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match event {
            Event::CouponCreated { coupon_id, code } => {
                info!(%coupon_id, %code, "coupon created");
            }
            Event::CouponUpdated(coupon_id) => {
                info!(%coupon_id, "coupon updated");
            }
            Event::CouponDeleted(coupon_id) => {
                info!(%coupon_id, "coupon deleted");
            }
            Event::CouponRedeemed {
                coupon_id,
                usage_id,
                discount,
                order_id,
            } => {
                info!(
                    %coupon_id,
                    %usage_id,
                    %discount,
                    order_id = order_id.as_deref().unwrap_or("-"),
                    "coupon redeemed"
                );
            }
        }
    }

    info!("Event processing loop stopped");
}
