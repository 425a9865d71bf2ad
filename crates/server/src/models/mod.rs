//! Domain entities persisted in the JSON document.

pub mod menu;
pub mod order;
pub mod user;

pub use menu::MenuItem;
pub use order::{Order, OrderLine, OrderStatusView, OrderWithContact};
pub use user::{PublicUser, User};
