//! Coupon eligibility rules and discount arithmetic.
//!
//! Everything here is pure: the caller loads the coupon and its usage counts,
//! and these functions decide. Checks run in a fixed order and the first
//! failing check determines the rejection.

use crate::entities::coupon::{DiscountType, Model as CouponModel};
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// Why a coupon cannot be applied. `Display` is the customer-facing message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CouponRejection {
    #[error("Coupon code not found")]
    NotFound,
    #[error("Coupon is inactive")]
    Inactive,
    #[error("Coupon has expired")]
    Expired,
    #[error("Minimum order value of {minimum} required")]
    BelowMinimumOrder { minimum: Decimal },
    #[error("Coupon usage limit reached")]
    UsageLimitReached,
    #[error("Coupon can only be used {limit} time(s) per customer")]
    CustomerLimitReached { limit: i32 },
    #[error("Coupon is not applicable to items in your cart")]
    ProductsNotApplicable,
    #[error("Coupon is not applicable to categories in your cart")]
    CategoriesNotApplicable,
    #[error("Order total is out of range")]
    OrderTotalOutOfRange,
}

impl CouponRejection {
    /// Stable machine-readable reason, used for metrics labels.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Inactive => "inactive",
            Self::Expired => "expired",
            Self::BelowMinimumOrder { .. } => "below_minimum",
            Self::UsageLimitReached => "usage_limit",
            Self::CustomerLimitReached { .. } => "customer_limit",
            Self::ProductsNotApplicable => "products_scope",
            Self::CategoriesNotApplicable => "categories_scope",
            Self::OrderTotalOutOfRange => "order_total_range",
        }
    }
}

/// Exclusive upper bound for order totals, matching the `DECIMAL(19,4)` money columns.
pub const ORDER_TOTAL_LIMIT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Redemption counts for one coupon, loaded by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageCounts {
    /// All usages of the coupon across customers.
    pub total: u64,
    /// Usages attributed to the identity being checked.
    pub by_customer: u64,
}

/// The cart the coupon is being applied to.
#[derive(Debug, Clone, Copy)]
pub struct OrderContext<'a> {
    pub order_total: Decimal,
    pub product_ids: Option<&'a [String]>,
    pub category_ids: Option<&'a [String]>,
}

impl<'a> OrderContext<'a> {
    pub fn new(order_total: Decimal) -> Self {
        Self {
            order_total,
            product_ids: None,
            category_ids: None,
        }
    }

    pub fn with_products(mut self, product_ids: &'a [String]) -> Self {
        self.product_ids = Some(product_ids);
        self
    }

    pub fn with_categories(mut self, category_ids: &'a [String]) -> Self {
        self.category_ids = Some(category_ids);
        self
    }
}

/// Codes are matched trimmed and uppercased.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Checks that depend only on the coupon and the order total.
pub fn check_eligibility(
    coupon: &CouponModel,
    order_total: Decimal,
    now: DateTime<Utc>,
) -> Result<(), CouponRejection> {
    if !coupon.is_active {
        return Err(CouponRejection::Inactive);
    }

    if coupon.expiry_date.is_some_and(|expiry| expiry < now) {
        return Err(CouponRejection::Expired);
    }

    if order_total < coupon.min_order_value {
        return Err(CouponRejection::BelowMinimumOrder {
            minimum: coupon.min_order_value.normalize(),
        });
    }

    Ok(())
}

/// Global and per-customer redemption caps.
pub fn check_limits(coupon: &CouponModel, usage: &UsageCounts) -> Result<(), CouponRejection> {
    if let Some(max_uses) = coupon.max_uses {
        if usage.total >= limit_as_count(max_uses) {
            return Err(CouponRejection::UsageLimitReached);
        }
    }

    if usage.by_customer >= limit_as_count(coupon.max_uses_per_customer) {
        return Err(CouponRejection::CustomerLimitReached {
            limit: coupon.max_uses_per_customer,
        });
    }

    Ok(())
}

/// Product and category gates. Each non-empty scope is checked on its own,
/// and only when the caller supplied ids for that axis.
pub fn check_scope(coupon: &CouponModel, order: &OrderContext<'_>) -> Result<(), CouponRejection> {
    if let Some(product_ids) = order.product_ids {
        if !coupon.applicable_products.is_empty()
            && !coupon.applicable_products.intersects(product_ids)
        {
            return Err(CouponRejection::ProductsNotApplicable);
        }
    }

    if let Some(category_ids) = order.category_ids {
        if !coupon.applicable_categories.is_empty()
            && !coupon.applicable_categories.intersects(category_ids)
        {
            return Err(CouponRejection::CategoriesNotApplicable);
        }
    }

    Ok(())
}

/// Discount for `order_total`, never above the order total, rounded to cents.
///
/// Fails with `OrderTotalOutOfRange` when the percentage product does not fit
/// in a `Decimal`.
pub fn compute_discount(
    discount_type: DiscountType,
    discount_value: Decimal,
    max_discount: Option<Decimal>,
    order_total: Decimal,
) -> Result<Decimal, CouponRejection> {
    let raw = match discount_type {
        DiscountType::Percentage => {
            let discount = order_total
                .checked_mul(discount_value)
                .and_then(|product| product.checked_div(Decimal::ONE_HUNDRED))
                .ok_or(CouponRejection::OrderTotalOutOfRange)?;
            match max_discount {
                Some(cap) if discount > cap => cap,
                _ => discount,
            }
        }
        DiscountType::Fixed => discount_value,
    };

    Ok(raw
        .min(order_total)
        .max(Decimal::ZERO)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Runs every check in order and returns the discount when all pass.
pub fn evaluate(
    coupon: &CouponModel,
    usage: &UsageCounts,
    order: &OrderContext<'_>,
    now: DateTime<Utc>,
) -> Result<Decimal, CouponRejection> {
    check_eligibility(coupon, order.order_total, now)?;
    check_limits(coupon, usage)?;
    check_scope(coupon, order)?;

    compute_discount(
        coupon.discount_type,
        coupon.discount_value,
        coupon.max_discount,
        order.order_total,
    )
}

fn limit_as_count(limit: i32) -> u64 {
    u64::try_from(limit).unwrap_or(0)
}
