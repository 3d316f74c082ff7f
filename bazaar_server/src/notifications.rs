//! The notification sink. Each event is turned into a message per recipient and handed to the delivery log.
use std::{future::Future, pin::Pin};

use bazaar_engine::events::{EventHooks, NotificationEvent};
use log::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub recipient: i64,
    pub subject: String,
    pub body: String,
}

pub fn compose(event: &NotificationEvent) -> Vec<Notification> {
    let (subject, body) = match event {
        NotificationEvent::OrderPlaced(e) => {
            (format!("Order #{} confirmed", e.order_id), format!("Thank you! Your order #{} has been placed.", e.order_id))
        },
        NotificationEvent::NewOrderForSeller(e) => (
            format!("New order #{}", e.order_id),
            format!("User #{} placed order #{}, which contains items from your shop.", e.buyer_id, e.order_id),
        ),
        NotificationEvent::OrderStatusChanged(e) => (
            format!("Order #{} updated", e.order_id),
            format!("The status of order #{} is now '{}'.", e.order_id, e.status),
        ),
    };
    event
        .recipients()
        .into_iter()
        .map(|recipient| Notification { recipient, subject: subject.clone(), body: body.clone() })
        .collect()
}

fn deliver(notification: &Notification) {
    info!("📧️ To user #{}: [{}] {}", notification.recipient, notification.subject, notification.body);
}

pub fn notification_hooks() -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks.on_notification(|event| {
        Box::pin(async move {
            trace!("📧️ Composing {} notification", event.kind());
            compose(&event).iter().for_each(deliver);
        }) as Pin<Box<dyn Future<Output = ()> + Send>>
    });
    hooks
}
