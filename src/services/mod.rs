// Pure coupon rules, no I/O
pub mod coupon_policy;

// Store-backed coupon service
pub mod coupons;
