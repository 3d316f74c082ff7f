use std::{future::Future, pin::Pin, sync::Arc};

use log::*;

use crate::events::{EventHandler, EventProducer, Handler, NotificationEvent};

/// The publishing side of the hooks. Cheap to clone; every API that emits events holds one.
#[derive(Default, Clone)]
pub struct EventProducers {
    pub notification_producers: Vec<EventProducer<NotificationEvent>>,
}

impl EventProducers {
    /// Hands the event to every subscriber. Never fails from the caller's point of view.
    pub async fn notify<E: Into<NotificationEvent>>(&self, event: E) {
        let event = event.into();
        if self.notification_producers.is_empty() {
            trace!("📬️ No notification subscribers for {}", event.kind());
            return;
        }
        for producer in &self.notification_producers {
            trace!("📬️ Publishing {} notification for order #{}", event.kind(), event.order_id());
            producer.publish_event(event.clone()).await;
        }
    }
}

pub struct EventHandlers {
    pub on_notification: Option<EventHandler<NotificationEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_notification = hooks.on_notification.map(|f| EventHandler::new(buffer_size, f));
        Self { on_notification }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_notification {
            result.notification_producers.push(handler.subscribe());
        }
        result
    }

    /// Spawns the handler loops. They stop once every producer has been dropped.
    pub fn start_handlers(self) {
        if let Some(handler) = self.on_notification {
            tokio::spawn(handler.start_handler());
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_notification: Option<Handler<NotificationEvent>>,
}

impl EventHooks {
    pub fn on_notification<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(NotificationEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_notification = Some(Arc::new(f));
        self
    }
}
