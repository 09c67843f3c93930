// SPDX-License-Identifier: Apache-2.0

//! Lossy, non-blocking fan-out of node update events to subscribers (SSE
//! clients in practice). A lock guards the subscriber set; each subscriber
//! owns an independently bounded queue so one slow consumer cannot stall
//! publication to the others, and publication itself never blocks.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Notify;
use uuid::Uuid;

use edgemesh_domain::node::NodeMetrics;
use edgemesh_domain::NodeStatus;

const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// An event published whenever a node's status or metrics change.
#[derive(Debug, Clone, Serialize)]
pub struct NodeUpdate {
    pub node_id: String,
    pub status: NodeStatus,
    pub metrics: Option<NodeMetrics>,
    pub updated_at: DateTime<Utc>,
}

struct SubscriberQueue {
    capacity: usize,
    buffer: Mutex<VecDeque<NodeUpdate>>,
    notify: Notify,
}

impl SubscriberQueue {
    fn push(&self, event: NodeUpdate) {
        let mut buffer = self.buffer.lock().unwrap();
        if buffer.len() >= self.capacity {
            buffer.pop_front();
        }
        buffer.push_back(event);
        drop(buffer);
        self.notify.notify_one();
    }
}

struct Inner {
    capacity: usize,
    subscribers: Mutex<Vec<(Uuid, Arc<SubscriberQueue>)>>,
}

/// Handle to the shared event bus. Cheaply [`Clone`]able.
#[derive(Clone)]
pub struct EventBus(Arc<Inner>);

impl EventBus {
    /// Creates a bus whose subscriber queues each hold up to `capacity`
    /// undelivered events.
    pub fn new(capacity: usize) -> Self {
        EventBus(Arc::new(Inner {
            capacity,
            subscribers: Mutex::new(Vec::new()),
        }))
    }

    /// Registers a new subscriber and returns a guard that reads events and
    /// automatically unsubscribes on drop.
    pub fn subscribe(&self) -> Subscription {
        let queue = Arc::new(SubscriberQueue {
            capacity: self.0.capacity,
            buffer: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
        });
        let id = Uuid::new_v4();
        self.0.subscribers.lock().unwrap().push((id, queue.clone()));
        Subscription {
            id,
            queue,
            bus: self.0.clone(),
        }
    }

    /// Delivers `event` to every subscriber present at the moment of the
    /// call. Never blocks: a full queue drops its oldest pending event
    /// before accepting the new one.
    pub fn publish(&self, event: NodeUpdate) {
        let snapshot: Vec<Arc<SubscriberQueue>> = {
            let subscribers = self.0.subscribers.lock().unwrap();
            subscribers.iter().map(|(_, queue)| queue.clone()).collect()
        };
        for queue in snapshot {
            queue.push(event.clone());
        }
    }

    /// Current number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.0.subscribers.lock().unwrap().len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

/// A live subscription to the bus. Dropping it unsubscribes.
pub struct Subscription {
    id: Uuid,
    queue: Arc<SubscriberQueue>,
    bus: Arc<Inner>,
}

impl Subscription {
    /// Awaits the next event, yielding once one has been published since
    /// the last call.
    pub async fn recv(&mut self) -> NodeUpdate {
        loop {
            if let Some(event) = self.queue.buffer.lock().unwrap().pop_front() {
                return event;
            }
            self.queue.notify.notified().await;
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let mut subscribers = self.bus.subscribers.lock().unwrap();
        subscribers.retain(|(id, _)| *id != self.id);
    }
}
