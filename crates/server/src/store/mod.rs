//! JSON-file persistence for the whole canteen document.
//!
//! The store owns one on-disk JSON document holding users, menu items,
//! orders, and the id counters. Every operation — read or write — enters a
//! single critical section; mutations rewrite the whole file before the lock
//! is released. That serialized read-modify-write cycle is the only
//! concurrency control the system has (and all it needs with one process).

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

use canteen_core::{MenuItemId, OrderId, OrderStatus, PaymentStatus, Phone, Role, UserId};

use crate::models::{MenuItem, Order, OrderLine, OrderWithContact, User};

/// Errors from the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but does not parse. Fatal at startup; the
    /// process refuses to run on partial data.
    #[error("store document is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    /// No entity with the given id.
    #[error("{entity} {id} not found")]
    NotFound {
        entity: &'static str,
        id: i32,
    },

    /// Insert that would give two accounts the same phone.
    #[error("an account with this phone already exists")]
    DuplicatePhone,
}

/// Monotonic id counters, incremented before use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counters {
    pub user: i32,
    pub menu: i32,
    pub order: i32,
}

/// The entire persisted state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub users: Vec<User>,
    pub menu_items: Vec<MenuItem>,
    pub orders: Vec<Order>,
    #[serde(rename = "_counters")]
    pub counters: Counters,
}

impl Document {
    /// Build the first-run document: one admin account and a starter menu.
    fn seed(admin_password_hash: &str) -> Self {
        let starter: [(&str, u32, &str); 10] = [
            ("Samosa", 10, "Snacks"),
            ("Poha", 20, "Breakfast"),
            ("Dosa", 30, "Breakfast"),
            ("Tea", 10, "Beverages"),
            ("Coffee", 15, "Beverages"),
            ("Veg Sandwich", 25, "Snacks"),
            ("Maggi", 30, "Snacks"),
            ("Thali", 60, "Meals"),
            ("Dal Rice", 50, "Meals"),
            ("Cold Drink", 20, "Beverages"),
        ];

        let menu_items = starter
            .iter()
            .enumerate()
            .map(|(i, (name, price, category))| MenuItem {
                id: MenuItemId::new(i32::try_from(i).unwrap_or(i32::MAX) + 1),
                name: (*name).to_owned(),
                price: rust_decimal::Decimal::from(*price),
                category: (*category).to_owned(),
                available: true,
            })
            .collect();

        Self {
            users: vec![User {
                id: UserId::new(1),
                name: "Admin".to_owned(),
                phone: Phone::parse("0000000000").unwrap_or_else(|_| unreachable!()),
                password_hash: admin_password_hash.to_owned(),
                role: Role::Admin,
            }],
            menu_items,
            orders: vec![],
            counters: Counters {
                user: 1,
                menu: 10,
                order: 0,
            },
        }
    }
}

/// Compute the next daily token: the count of orders already created on
/// `now`'s UTC calendar date, plus one.
///
/// The bucket is a wall-clock date, not a rolling window, so orders at 23:59
/// and 00:01 land in different days and may both get token 1. Accepted.
fn next_token(orders: &[Order], now: DateTime<Utc>) -> u32 {
    let today = now.date_naive();
    let count = orders
        .iter()
        .filter(|o| o.created_at.date_naive() == today)
        .count();
    u32::try_from(count).unwrap_or(u32::MAX).saturating_add(1)
}

/// Serialized-access handle to the persisted document.
pub struct Store {
    path: PathBuf,
    doc: Mutex<Document>,
}

impl Store {
    /// Open the store, seeding the document on first run.
    ///
    /// Idempotent: an existing file is parsed and returned unchanged; a
    /// missing file is created with the seed document (admin user plus
    /// starter menu).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the file cannot be read or written, or
    /// `StoreError::Malformed` if an existing file fails to parse — startup
    /// aborts rather than operating on partial data.
    pub async fn open(path: impl Into<PathBuf>, admin_password_hash: &str) -> Result<Self, StoreError> {
        let path = path.into();

        let doc = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let doc = Document::seed(admin_password_hash);
                persist(&path, &doc).await?;
                tracing::info!(path = %path.display(), "store initialised with seed document");
                doc
            }
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            path,
            doc: Mutex::new(doc),
        })
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Look up a user by phone number.
    pub async fn find_user_by_phone(&self, phone: &Phone) -> Option<User> {
        let doc = self.doc.lock().await;
        doc.users.iter().find(|u| &u.phone == phone).cloned()
    }

    /// Append a new user, assigning the next user id.
    ///
    /// Phone uniqueness is checked here, inside the critical section, so
    /// two racing registrations for the same phone cannot both land.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicatePhone` if the phone already has an
    /// account, `StoreError::Io` if persisting fails.
    pub async fn create_user(
        &self,
        name: &str,
        phone: Phone,
        password_hash: String,
        role: Role,
    ) -> Result<User, StoreError> {
        let mut doc = self.doc.lock().await;
        if doc.users.iter().any(|u| u.phone == phone) {
            return Err(StoreError::DuplicatePhone);
        }
        doc.counters.user += 1;
        let user = User {
            id: UserId::new(doc.counters.user),
            name: name.to_owned(),
            phone,
            password_hash,
            role,
        };
        doc.users.push(user.clone());
        persist(&self.path, &doc).await?;
        Ok(user)
    }

    // =========================================================================
    // Menu
    // =========================================================================

    /// All menu items, regardless of availability.
    pub async fn menu(&self) -> Vec<MenuItem> {
        self.doc.lock().await.menu_items.clone()
    }

    /// Append a menu item, assigning the next menu id. New items start
    /// available.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if persisting fails.
    pub async fn add_menu_item(
        &self,
        name: &str,
        price: rust_decimal::Decimal,
        category: &str,
    ) -> Result<MenuItem, StoreError> {
        let mut doc = self.doc.lock().await;
        doc.counters.menu += 1;
        let item = MenuItem {
            id: MenuItemId::new(doc.counters.menu),
            name: name.to_owned(),
            price,
            category: category.to_owned(),
            available: true,
        };
        doc.menu_items.push(item.clone());
        persist(&self.path, &doc).await?;
        Ok(item)
    }

    /// Overwrite a menu item in place.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown id, `StoreError::Io` if
    /// persisting fails.
    pub async fn update_menu_item(
        &self,
        id: MenuItemId,
        name: &str,
        price: rust_decimal::Decimal,
        category: &str,
        available: bool,
    ) -> Result<(), StoreError> {
        let mut doc = self.doc.lock().await;
        let item = doc
            .menu_items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(StoreError::NotFound {
                entity: "menu item",
                id: id.as_i32(),
            })?;
        item.name = name.to_owned();
        item.price = price;
        item.category = category.to_owned();
        item.available = available;
        persist(&self.path, &doc).await?;
        Ok(())
    }

    /// Remove a menu item. Removing an unknown id is a no-op, matching the
    /// idempotent delete the dashboard expects.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if persisting fails.
    pub async fn delete_menu_item(&self, id: MenuItemId) -> Result<(), StoreError> {
        let mut doc = self.doc.lock().await;
        doc.menu_items.retain(|i| i.id != id);
        persist(&self.path, &doc).await?;
        Ok(())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Create an order: assign the next order id, allocate today's token,
    /// fix the total, and persist — all inside one critical section, so two
    /// near-simultaneous orders can never share a token.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if persisting fails.
    pub async fn create_order(
        &self,
        user_id: UserId,
        items: Vec<OrderLine>,
        guest: Option<(String, Phone)>,
    ) -> Result<Order, StoreError> {
        let mut doc = self.doc.lock().await;
        doc.counters.order += 1;
        let now = Utc::now();
        let (guest_name, guest_phone) = match guest {
            Some((name, phone)) => (Some(name), Some(phone)),
            None => (None, None),
        };
        let order = Order {
            id: OrderId::new(doc.counters.order),
            user_id,
            guest_name,
            guest_phone,
            token_number: next_token(&doc.orders, now),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::PaymentPending,
            total: Order::total_of(&items),
            items,
            created_at: now,
        };
        doc.orders.push(order.clone());
        persist(&self.path, &doc).await?;
        Ok(order)
    }

    /// Look up an order by id.
    pub async fn order_by_id(&self, id: OrderId) -> Option<Order> {
        let doc = self.doc.lock().await;
        doc.orders.iter().find(|o| o.id == id).cloned()
    }

    /// Look up an order with its resolved contact (guest fields if present,
    /// else the owning user's name and phone).
    pub async fn order_with_contact(&self, id: OrderId) -> Option<OrderWithContact> {
        let doc = self.doc.lock().await;
        let order = doc.orders.iter().find(|o| o.id == id)?;
        Some(enrich(order, &doc.users))
    }

    /// Orders the dashboard still tracks (pending, preparing, ready),
    /// ascending by creation time, each with a resolved contact.
    pub async fn active_orders(&self) -> Vec<OrderWithContact> {
        let doc = self.doc.lock().await;
        let mut active: Vec<&Order> = doc
            .orders
            .iter()
            .filter(|o| o.status.is_active())
            .collect();
        active.sort_by_key(|o| o.created_at);
        active.iter().map(|o| enrich(o, &doc.users)).collect()
    }

    /// The most recent orders for a registered user, newest first, capped at
    /// ten.
    pub async fn user_orders(&self, user_id: UserId) -> Vec<Order> {
        let doc = self.doc.lock().await;
        let mut own: Vec<Order> = doc
            .orders
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        own.sort_by_key(|o| std::cmp::Reverse(o.created_at));
        own.truncate(10);
        own
    }

    /// Set an order's preparation status. Unconditional — the HTTP surface
    /// only exposes forward transitions.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown id, `StoreError::Io` if
    /// persisting fails.
    pub async fn set_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), StoreError> {
        let mut doc = self.doc.lock().await;
        let order = doc
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(StoreError::NotFound {
                entity: "order",
                id: id.as_i32(),
            })?;
        order.status = status;
        persist(&self.path, &doc).await?;
        Ok(())
    }

    /// Set an order's payment status. Idempotent by construction: it just
    /// assigns the field.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown id, `StoreError::Io` if
    /// persisting fails.
    pub async fn set_payment_status(
        &self,
        id: OrderId,
        payment_status: PaymentStatus,
    ) -> Result<(), StoreError> {
        let mut doc = self.doc.lock().await;
        let order = doc
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(StoreError::NotFound {
                entity: "order",
                id: id.as_i32(),
            })?;
        order.payment_status = payment_status;
        persist(&self.path, &doc).await?;
        Ok(())
    }
}

/// Resolve the display contact for an order.
fn enrich(order: &Order, users: &[User]) -> OrderWithContact {
    if order.user_id.is_guest() || order.guest_phone.is_some() {
        OrderWithContact {
            user_name: order.guest_name.clone(),
            user_phone: order.guest_phone.clone(),
            order: order.clone(),
        }
    } else {
        let user = users.iter().find(|u| u.id == order.user_id);
        OrderWithContact {
            user_name: user.map(|u| u.name.clone()),
            user_phone: user.map(|u| u.phone.clone()),
            order: order.clone(),
        }
    }
}

/// Rewrite the whole document. Called with the lock held.
async fn persist(path: &Path, doc: &Document) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(doc)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use rust_decimal::Decimal;

    use super::*;

    static NEXT_DB: AtomicU32 = AtomicU32::new(0);

    fn temp_db_path() -> PathBuf {
        let n = NEXT_DB.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!("canteen-store-test-{}-{n}.json", std::process::id()))
    }

    async fn open_store() -> (Store, PathBuf) {
        let path = temp_db_path();
        let store = Store::open(&path, "test-hash").await.unwrap();
        (store, path)
    }

    fn lines(entries: &[(&str, u32, u32)]) -> Vec<OrderLine> {
        entries
            .iter()
            .enumerate()
            .map(|(i, (name, price, qty))| OrderLine {
                id: MenuItemId::new(i32::try_from(i).unwrap() + 1),
                name: (*name).to_owned(),
                price: Decimal::from(*price),
                qty: *qty,
            })
            .collect()
    }

    fn order_at(id: i32, created_at: &str) -> Order {
        Order {
            id: OrderId::new(id),
            user_id: UserId::GUEST,
            guest_name: None,
            guest_phone: None,
            token_number: 1,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::PaymentPending,
            items: vec![],
            total: Decimal::ZERO,
            created_at: created_at.parse().unwrap(),
        }
    }

    #[test]
    fn test_next_token_counts_only_today() {
        let now: DateTime<Utc> = "2026-08-25T09:00:00Z".parse().unwrap();
        let orders = vec![
            order_at(1, "2026-08-24T23:59:00Z"),
            order_at(2, "2026-08-25T00:01:00Z"),
            order_at(3, "2026-08-25T08:30:00Z"),
        ];

        // Yesterday's order is not counted
        assert_eq!(next_token(&orders, now), 3);
    }

    #[test]
    fn test_next_token_resets_on_new_day() {
        let orders = vec![
            order_at(1, "2026-08-24T10:00:00Z"),
            order_at(2, "2026-08-24T11:00:00Z"),
        ];
        let next_day: DateTime<Utc> = "2026-08-25T00:01:00Z".parse().unwrap();

        assert_eq!(next_token(&orders, next_day), 1);
        assert_eq!(next_token(&[], next_day), 1);
    }

    #[tokio::test]
    async fn test_open_seeds_once() {
        let (store, path) = open_store().await;

        let menu = store.menu().await;
        assert_eq!(menu.len(), 10);
        assert_eq!(menu.first().unwrap().name, "Samosa");

        let admin = store
            .find_user_by_phone(&Phone::parse("0000000000").unwrap())
            .await
            .unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert_eq!(admin.password_hash, "test-hash");

        // Reopening an existing file must not reseed
        store.add_menu_item("Idli", Decimal::from(25), "Breakfast").await.unwrap();
        drop(store);
        let reopened = Store::open(&path, "other-hash").await.unwrap();
        assert_eq!(reopened.menu().await.len(), 11);
        let admin = reopened
            .find_user_by_phone(&Phone::parse("0000000000").unwrap())
            .await
            .unwrap();
        assert_eq!(admin.password_hash, "test-hash");

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_create_user_rejects_duplicate_phone() {
        let (store, path) = open_store().await;
        let phone = Phone::parse("9000000009").unwrap();

        store
            .create_user("Ravi", phone.clone(), "hash-1".to_owned(), Role::User)
            .await
            .unwrap();
        let second = store
            .create_user("Ravi", phone.clone(), "hash-2".to_owned(), Role::User)
            .await;
        assert!(matches!(second, Err(StoreError::DuplicatePhone)));

        // The seeded admin phone is taken too
        let admin = store
            .create_user(
                "Imposter",
                Phone::parse("0000000000").unwrap(),
                "hash-3".to_owned(),
                Role::User,
            )
            .await;
        assert!(matches!(admin, Err(StoreError::DuplicatePhone)));

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_concurrent_registrations_create_one_account() {
        let (store, path) = open_store().await;
        let store = Arc::new(store);

        let mut attempts = Vec::new();
        for i in 0..4 {
            let store = Arc::clone(&store);
            attempts.push(tokio::spawn(async move {
                store
                    .create_user(
                        "Ravi",
                        Phone::parse("9000000009").unwrap(),
                        format!("hash-{i}"),
                        Role::User,
                    )
                    .await
            }));
        }

        let mut created = 0;
        for attempt in attempts {
            match attempt.await.unwrap() {
                Ok(_) => created += 1,
                Err(StoreError::DuplicatePhone) => {}
                Err(err) => panic!("unexpected error: {err}"),
            }
        }
        assert_eq!(created, 1);

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_open_rejects_malformed_file() {
        let path = temp_db_path();
        std::fs::write(&path, "{not json").unwrap();

        let result = Store::open(&path, "hash").await;
        assert!(matches!(result, Err(StoreError::Malformed(_))));

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_create_order_fixes_total_and_token() {
        let (store, path) = open_store().await;

        let order = store
            .create_order(
                UserId::GUEST,
                lines(&[("Samosa", 10, 2), ("Tea", 10, 1)]),
                Some(("Asha".to_owned(), Phone::parse("9876543210").unwrap())),
            )
            .await
            .unwrap();

        assert_eq!(order.total, Decimal::from(30));
        assert_eq!(order.token_number, 1);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::PaymentPending);

        let second = store
            .create_order(UserId::GUEST, lines(&[("Tea", 10, 1)]), None)
            .await
            .unwrap();
        assert_eq!(second.token_number, 2);
        assert!(second.id > order.id);

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_concurrent_orders_get_distinct_tokens() {
        let (store, path) = open_store().await;
        let store = Arc::new(store);

        let a = tokio::spawn({
            let store = Arc::clone(&store);
            async move {
                store
                    .create_order(UserId::GUEST, lines(&[("Tea", 10, 1)]), None)
                    .await
                    .unwrap()
            }
        });
        let b = tokio::spawn({
            let store = Arc::clone(&store);
            async move {
                store
                    .create_order(UserId::GUEST, lines(&[("Tea", 10, 1)]), None)
                    .await
                    .unwrap()
            }
        });

        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        assert_ne!(a.token_number, b.token_number);
        assert_ne!(a.id, b.id);

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_status_and_payment_updates() {
        let (store, path) = open_store().await;
        let order = store
            .create_order(UserId::GUEST, lines(&[("Tea", 10, 1)]), None)
            .await
            .unwrap();

        store
            .set_payment_status(order.id, PaymentStatus::Paid)
            .await
            .unwrap();
        // Idempotent: a second confirmation is not an error
        store
            .set_payment_status(order.id, PaymentStatus::Paid)
            .await
            .unwrap();
        store
            .set_order_status(order.id, OrderStatus::Ready)
            .await
            .unwrap();

        let fetched = store.order_by_id(order.id).await.unwrap();
        assert_eq!(fetched.status, OrderStatus::Ready);
        assert_eq!(fetched.payment_status, PaymentStatus::Paid);

        let missing = store
            .set_order_status(OrderId::new(999), OrderStatus::Ready)
            .await;
        assert!(matches!(missing, Err(StoreError::NotFound { .. })));

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_active_orders_enriched_and_sorted() {
        let (store, path) = open_store().await;

        let guest = store
            .create_order(
                UserId::GUEST,
                lines(&[("Tea", 10, 1)]),
                Some(("Asha".to_owned(), Phone::parse("9876543210").unwrap())),
            )
            .await
            .unwrap();
        let registered = store
            .create_order(UserId::new(1), lines(&[("Thali", 60, 1)]), None)
            .await
            .unwrap();
        let collected = store
            .create_order(UserId::GUEST, lines(&[("Tea", 10, 1)]), None)
            .await
            .unwrap();
        store
            .set_order_status(collected.id, OrderStatus::Collected)
            .await
            .unwrap();

        let active = store.active_orders().await;
        assert_eq!(active.len(), 2);
        assert_eq!(active.first().unwrap().order.id, guest.id);
        assert_eq!(active.first().unwrap().user_name.as_deref(), Some("Asha"));
        // Registered order resolves contact from the seeded admin
        assert_eq!(active.get(1).unwrap().order.id, registered.id);
        assert_eq!(active.get(1).unwrap().user_name.as_deref(), Some("Admin"));
        assert_eq!(
            active.get(1).unwrap().user_phone,
            Some(Phone::parse("0000000000").unwrap())
        );

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_user_orders_newest_first_capped() {
        let (store, path) = open_store().await;

        for _ in 0..12 {
            store
                .create_order(UserId::new(1), lines(&[("Tea", 10, 1)]), None)
                .await
                .unwrap();
        }
        store
            .create_order(UserId::GUEST, lines(&[("Tea", 10, 1)]), None)
            .await
            .unwrap();

        let own = store.user_orders(UserId::new(1)).await;
        assert_eq!(own.len(), 10);
        assert!(own.first().unwrap().id > own.last().unwrap().id);

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_menu_crud() {
        let (store, path) = open_store().await;

        let item = store
            .add_menu_item("Idli", Decimal::from(25), "Breakfast")
            .await
            .unwrap();
        assert_eq!(item.id, MenuItemId::new(11));
        assert!(item.available);

        store
            .update_menu_item(item.id, "Idli", Decimal::from(30), "Breakfast", false)
            .await
            .unwrap();
        let menu = store.menu().await;
        let updated = menu.iter().find(|i| i.id == item.id).unwrap();
        assert_eq!(updated.price, Decimal::from(30));
        assert!(!updated.available);
        // Unavailable items stay in the raw catalog
        assert_eq!(menu.len(), 11);

        let missing = store
            .update_menu_item(MenuItemId::new(999), "X", Decimal::ZERO, "Y", true)
            .await;
        assert!(matches!(missing, Err(StoreError::NotFound { .. })));

        store.delete_menu_item(item.id).await.unwrap();
        assert_eq!(store.menu().await.len(), 10);
        // Deleting again is a no-op
        store.delete_menu_item(item.id).await.unwrap();

        let _ = std::fs::remove_file(path);
    }
}
