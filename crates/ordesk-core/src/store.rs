//! Order storage seam and the in-memory implementation used by the demo
//! pipeline and the evaluator.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::types::{OrderRecord, OrderStatus, UpdateOutcome};

// ─── OrderStore trait ─────────────────────────────────────────────────────

/// Key-value lookup and conditional mutation of order records.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn get(&self, order_id: &str) -> Option<OrderRecord>;

    /// Change the shipping address of an order that has not shipped yet.
    ///
    /// Rejections ("order not found", "order already shipped") come back as
    /// an unsuccessful [`UpdateOutcome`], never as a panic or an `Err` — the
    /// workflow deliberately continues after a rejected update.
    async fn update_address(&self, order_id: &str, new_address: &str) -> UpdateOutcome;
}

// ─── InMemoryOrderStore ───────────────────────────────────────────────────

/// Mutex-guarded map of orders. Safe to share across tasks, though the
/// pipeline only ever runs one workflow at a time against it.
#[derive(Default)]
pub struct InMemoryOrderStore {
    orders: Mutex<HashMap<String, OrderRecord>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with the two demo orders: 12345 still processing,
    /// 67890 already shipped.
    pub fn seeded() -> Self {
        let store = Self::new();
        store.insert(
            "12345",
            OrderRecord {
                status: OrderStatus::Processing,
                customer: "Juan Pérez".into(),
                email: "juan@example.com".into(),
                address: "123 Calle Falsa".into(),
                items: vec!["Laptop HP".into()],
                total: 1200.0,
                date: "2024-11-20".into(),
            },
        );
        store.insert(
            "67890",
            OrderRecord {
                status: OrderStatus::Shipped,
                customer: "María González".into(),
                email: "maria@example.com".into(),
                address: "789 Plaza Mayor".into(),
                items: vec!["Mouse Logitech".into(), "Teclado Mecánico".into()],
                total: 150.0,
                date: "2024-11-15".into(),
            },
        );
        store
    }

    pub fn insert(&self, order_id: impl Into<String>, record: OrderRecord) {
        self.lock().insert(order_id.into(), record);
    }

    /// Ordered snapshot of every record, for listings and assertions.
    pub fn snapshot(&self) -> BTreeMap<String, OrderRecord> {
        self.lock()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, OrderRecord>> {
        // A poisoned lock still holds consistent data for this store: every
        // write is a single field assignment.
        self.orders.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn get(&self, order_id: &str) -> Option<OrderRecord> {
        self.lock().get(order_id).cloned()
    }

    async fn update_address(&self, order_id: &str, new_address: &str) -> UpdateOutcome {
        let mut orders = self.lock();
        let Some(order) = orders.get_mut(order_id) else {
            return UpdateOutcome::rejected("order not found");
        };
        if order.status == OrderStatus::Shipped {
            return UpdateOutcome::rejected("order already shipped");
        }
        order.address = new_address.to_string();
        UpdateOutcome::ok(format!("address updated to {new_address}"))
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
