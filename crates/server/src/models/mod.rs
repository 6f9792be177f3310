//! Domain models for the server.
//!
//! These are the validated shapes handlers work with. Database row types
//! live next to their repositories in `crate::db`.

pub mod admin_user;
pub mod order;
pub mod product;
pub mod session;
pub mod settings;

pub use admin_user::{AdminUser, AdminUserChanges, NewAdminUser};
pub use order::{NewOrder, Order, OrderItem, OrderSummary};
pub use product::{Product, ProductInput};
pub use session::CurrentAdmin;
pub use settings::{StoreSettings, keys as setting_keys};
