use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::acme::order::{Order, OrderId};
use crate::error::Error;
use crate::types::Result;

/// In-memory, append-only store of orders
///
/// Ids are arena indices handed out under the registry lock, so they are
/// dense, zero-based and follow insertion order. Each order sits behind
/// its own lock; `update` holds it across the whole read-modify-write.
#[derive(Debug, Default)]
pub struct OrderRegistry {
    orders: Mutex<Vec<Arc<Mutex<Order>>>>,
}

impl OrderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `order`, returning its id
    pub fn create(&self, mut order: Order) -> Result<OrderId> {
        let mut orders = self.orders.lock()?;
        let id = OrderId(orders.len());
        order.id = id;
        orders.push(Arc::new(Mutex::new(order)));
        debug!("Created order {}", id);
        Ok(id)
    }

    /// Snapshot of the order at `id`
    pub fn lookup(&self, id: OrderId) -> Result<Order> {
        let entry = self.entry(id)?;
        let order = entry.lock()?;
        Ok(order.clone())
    }

    /// Run `f` on the order at `id` while holding its lock
    ///
    /// `f` must leave the order untouched when it fails.
    pub fn update<T, F>(&self, id: OrderId, f: F) -> Result<T>
    where
        F: FnOnce(&mut Order) -> Result<T>,
    {
        let entry = self.entry(id)?;
        let mut order = entry.lock()?;
        f(&mut order)
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.orders.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn entry(&self, id: OrderId) -> Result<Arc<Mutex<Order>>> {
        let orders = self.orders.lock()?;
        orders
            .get(id.0)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("order {}", id)))
    }
}
