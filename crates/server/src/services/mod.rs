//! Business logic sitting between the HTTP surface and the store.

pub mod auth;
pub mod qr;
pub mod sms;
pub mod upi;
