//! Order model and its client-facing projections.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use canteen_core::{MenuItemId, OrderId, OrderStatus, PaymentStatus, Phone, UserId};

/// One line of an order, denormalized at creation time.
///
/// Name and price are copied from the menu item so later menu edits do not
/// rewrite order history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderLine {
    pub id: MenuItemId,
    pub name: String,
    pub price: Decimal,
    pub qty: u32,
}

impl OrderLine {
    /// Price times quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.qty)
    }
}

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// `UserId::GUEST` (0) for orders placed without an account.
    pub user_id: UserId,
    pub guest_name: Option<String>,
    pub guest_phone: Option<Phone>,
    /// Daily-sequential human-facing number; resets every calendar day.
    pub token_number: u32,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub items: Vec<OrderLine>,
    /// Sum of `price * qty` over `items`, fixed at creation.
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Sum of line totals for a set of order lines.
    #[must_use]
    pub fn total_of(items: &[OrderLine]) -> Decimal {
        items.iter().map(OrderLine::line_total).sum()
    }
}

/// An order annotated with a resolved contact for the dashboard.
///
/// Guest orders carry their own name/phone; registered orders resolve them
/// from the user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderWithContact {
    #[serde(flatten)]
    pub order: Order,
    pub user_name: Option<String>,
    pub user_phone: Option<Phone>,
}

/// Public projection polled by unauthenticated clients.
///
/// Deliberately excludes every phone number — the poller already knows its
/// own contact details and must not learn anyone else's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusView {
    pub id: OrderId,
    pub token_number: u32,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub items: Vec<OrderLine>,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub guest_name: Option<String>,
}

impl From<&Order> for OrderStatusView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            token_number: order.token_number,
            status: order.status,
            payment_status: order.payment_status,
            items: order.items.clone(),
            total: order.total,
            created_at: order.created_at,
            guest_name: order.guest_name.clone(),
        }
    }
}
