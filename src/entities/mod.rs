/// Coupon entities module
pub mod coupon;
pub mod coupon_usage;

// Re-export entities
pub use coupon::{DiscountType, Entity as Coupon, Model as CouponModel, ScopeIds};
pub use coupon_usage::{Entity as CouponUsage, Model as CouponUsageModel};
