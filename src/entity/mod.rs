pub mod admins;
pub mod audit_logs;
pub mod carts;
pub mod coupons;
pub mod orders;
pub mod products;

pub use admins::Entity as Admins;
pub use audit_logs::Entity as AuditLogs;
pub use carts::Entity as Carts;
pub use coupons::Entity as Coupons;
pub use orders::Entity as Orders;
pub use products::Entity as Products;
