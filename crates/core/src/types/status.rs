//! Status enums for orders and users.

use serde::{Deserialize, Serialize};

/// Order preparation status.
///
/// Moves forward through `pending -> preparing -> ready -> collected`.
/// No backward transition is exposed over the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Collected,
}

impl OrderStatus {
    /// Returns `true` for orders the shopkeeper dashboard still tracks.
    ///
    /// Collected orders drop out of the active listing.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self, Self::Collected)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Preparing => write!(f, "preparing"),
            Self::Ready => write!(f, "ready"),
            Self::Collected => write!(f, "collected"),
        }
    }
}

/// Order payment status.
///
/// One-way: `payment_pending -> paid`. Payment confirmation is a manual
/// shopkeeper action taken after seeing the UPI notification, not a gateway
/// callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    PaymentPending,
    Paid,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PaymentPending => write!(f, "payment_pending"),
            Self::Paid => write!(f, "paid"),
        }
    }
}

/// User role carried in the bearer token claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Shopkeeper with access to the dashboard endpoints.
    Admin,
    /// Registered customer.
    #[default]
    User,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::User => write!(f, "user"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}
