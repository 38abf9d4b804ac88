mod common;

use assert_matches::assert_matches;
use common::{days_from_now, fixed, percentage, TestApp};
use rust_decimal_macros::dec;
use storefront_coupons::{
    entities::DiscountType,
    errors::ServiceError,
    services::coupons::{
        RecordUsageInput, RedeemCouponInput, UpdateCouponInput, ValidateCouponInput,
    },
};
use uuid::Uuid;

fn order(code: &str, total: rust_decimal::Decimal) -> ValidateCouponInput {
    ValidateCouponInput::new(code, total)
}

fn for_user(code: &str, total: rust_decimal::Decimal, user_id: &str) -> ValidateCouponInput {
    ValidateCouponInput {
        user_id: Some(user_id.to_string()),
        ..order(code, total)
    }
}

#[tokio::test]
async fn inactive_coupon_never_validates() {
    let app = TestApp::new().await;
    let mut input = percentage("OFF10", dec!(10));
    input.is_active = Some(false);
    app.seed_coupon(input).await;

    let result = app.coupons().validate_coupon(&order("OFF10", dec!(100))).await;

    assert!(!result.valid);
    assert_eq!(result.message, "Coupon is inactive");
    assert!(result.discount.is_none());
}

#[tokio::test]
async fn expired_coupon_is_rejected_even_when_active() {
    let app = TestApp::new().await;
    let mut input = percentage("OLD", dec!(10));
    input.expiry_date = Some(days_from_now(-1));
    app.seed_coupon(input).await;

    let result = app.coupons().validate_coupon(&order("OLD", dec!(100))).await;

    assert!(!result.valid);
    assert_eq!(result.message, "Coupon has expired");
}

#[tokio::test]
async fn future_expiry_still_validates() {
    let app = TestApp::new().await;
    let mut input = fixed("SOON", dec!(5));
    input.expiry_date = Some(days_from_now(3));
    app.seed_coupon(input).await;

    let result = app.coupons().validate_coupon(&order("SOON", dec!(20))).await;

    assert!(result.valid);
    assert_eq!(result.discount, Some(dec!(5)));
}

#[tokio::test]
async fn percentage_discount_is_capped_by_max_discount() {
    let app = TestApp::new().await;
    let mut input = percentage("BIG20", dec!(20));
    input.max_discount = Some(dec!(50));
    let coupon = app.seed_coupon(input).await;

    let result = app.coupons().validate_coupon(&order("BIG20", dec!(500))).await;

    assert!(result.valid);
    assert_eq!(result.message, "Coupon applied successfully");
    assert_eq!(result.discount, Some(dec!(50)));
    assert_eq!(result.coupon_id, Some(coupon.id));
}

#[tokio::test]
async fn fixed_discount_is_clamped_to_order_total() {
    let app = TestApp::new().await;
    app.seed_coupon(fixed("HUNDRED", dec!(100))).await;

    let result = app.coupons().validate_coupon(&order("HUNDRED", dec!(60))).await;

    assert!(result.valid);
    assert_eq!(result.discount, Some(dec!(60)));
}

#[tokio::test]
async fn order_below_minimum_is_rejected_with_the_minimum() {
    let app = TestApp::new().await;
    let mut input = fixed("MIN1000", dec!(10));
    input.min_order_value = Some(dec!(1000));
    app.seed_coupon(input).await;

    let result = app.coupons().validate_coupon(&order("MIN1000", dec!(500))).await;

    assert!(!result.valid);
    assert!(result.message.contains("1000"), "{}", result.message);
}

#[tokio::test]
async fn category_mismatch_is_rejected() {
    let app = TestApp::new().await;
    let mut input = percentage("CATA", dec!(10));
    input.applicable_categories = Some(vec!["cat-A".to_string()]);
    app.seed_coupon(input).await;

    let mismatch = ValidateCouponInput {
        category_ids: Some(vec!["cat-B".to_string()]),
        ..order("CATA", dec!(100))
    };
    let result = app.coupons().validate_coupon(&mismatch).await;
    assert!(!result.valid);
    assert_eq!(
        result.message,
        "Coupon is not applicable to categories in your cart"
    );

    let matching = ValidateCouponInput {
        category_ids: Some(vec!["cat-B".to_string(), "cat-A".to_string()]),
        ..order("CATA", dec!(100))
    };
    assert!(app.coupons().validate_coupon(&matching).await.valid);
}

#[tokio::test]
async fn product_scope_is_only_checked_when_products_are_supplied() {
    let app = TestApp::new().await;
    let mut input = fixed("SHOES", dec!(5));
    input.applicable_products = Some(vec!["sku-1".to_string()]);
    app.seed_coupon(input).await;

    assert!(app.coupons().validate_coupon(&order("SHOES", dec!(50))).await.valid);

    let other = ValidateCouponInput {
        product_ids: Some(vec!["sku-9".to_string()]),
        ..order("SHOES", dec!(50))
    };
    let result = app.coupons().validate_coupon(&other).await;
    assert!(!result.valid);
    assert_eq!(result.message, "Coupon is not applicable to items in your cart");
}

#[tokio::test]
async fn unknown_code_is_not_found() {
    let app = TestApp::new().await;

    let result = app.coupons().validate_coupon(&order("NOPE", dec!(100))).await;

    assert!(!result.valid);
    assert_eq!(result.message, "Coupon code not found");
    assert!(result.coupon_id.is_none());
}

#[tokio::test]
async fn codes_match_case_insensitively() {
    let app = TestApp::new().await;
    let coupon = app.seed_coupon(fixed("  Summer10 ", dec!(10))).await;
    assert_eq!(coupon.code, "SUMMER10");

    let result = app.coupons().validate_coupon(&order("summer10", dec!(40))).await;
    assert!(result.valid);
    assert_eq!(result.coupon_id, Some(coupon.id));
}

#[tokio::test]
async fn repeated_validation_is_idempotent() {
    let app = TestApp::new().await;
    app.seed_coupon(percentage("SAME", dec!(15))).await;
    let input = for_user("SAME", dec!(33.33), "user-1");

    let first = app.coupons().validate_coupon(&input).await;
    let second = app.coupons().validate_coupon(&input).await;

    assert!(first.valid);
    assert_eq!(first.discount, Some(dec!(5.00)));
    assert_eq!(first, second);
}

#[tokio::test]
async fn per_customer_limit_blocks_after_recorded_usages() {
    let app = TestApp::new().await;
    let mut input = fixed("TWICE", dec!(5));
    input.max_uses_per_customer = Some(2);
    let coupon = app.seed_coupon(input).await;

    for _ in 0..2 {
        let check = app
            .coupons()
            .validate_coupon(&for_user("TWICE", dec!(50), "user-1"))
            .await;
        assert!(check.valid);
        app.coupons()
            .record_coupon_usage(RecordUsageInput {
                user_id: Some("user-1".to_string()),
                ..RecordUsageInput::new(coupon.id, dec!(5))
            })
            .await
            .expect("usage recorded");
    }

    let blocked = app
        .coupons()
        .validate_coupon(&for_user("TWICE", dec!(50), "user-1"))
        .await;
    assert!(!blocked.valid);
    assert_eq!(blocked.message, "Coupon can only be used 2 time(s) per customer");

    // Another customer is unaffected
    let other = app
        .coupons()
        .validate_coupon(&for_user("TWICE", dec!(50), "user-2"))
        .await;
    assert!(other.valid);
}

#[tokio::test]
async fn guest_email_identifies_the_customer() {
    let app = TestApp::new().await;
    let coupon = app.seed_coupon(fixed("GUEST", dec!(5))).await;

    app.coupons()
        .record_coupon_usage(RecordUsageInput {
            guest_email: Some("guest@example.com".to_string()),
            ..RecordUsageInput::new(coupon.id, dec!(5))
        })
        .await
        .unwrap();

    let same_guest = ValidateCouponInput {
        guest_email: Some("guest@example.com".to_string()),
        ..order("GUEST", dec!(30))
    };
    assert!(!app.coupons().validate_coupon(&same_guest).await.valid);

    let new_guest = ValidateCouponInput {
        guest_email: Some("someone@example.com".to_string()),
        ..order("GUEST", dec!(30))
    };
    assert!(app.coupons().validate_coupon(&new_guest).await.valid);
}

#[tokio::test]
async fn global_limit_applies_across_customers() {
    let app = TestApp::new().await;
    let mut input = fixed("ONCE", dec!(5));
    input.max_uses = Some(1);
    let coupon = app.seed_coupon(input).await;

    app.coupons()
        .record_coupon_usage(RecordUsageInput {
            user_id: Some("user-1".to_string()),
            ..RecordUsageInput::new(coupon.id, dec!(5))
        })
        .await
        .unwrap();

    let result = app
        .coupons()
        .validate_coupon(&for_user("ONCE", dec!(50), "user-2"))
        .await;
    assert!(!result.valid);
    assert_eq!(result.message, "Coupon usage limit reached");
}

#[tokio::test]
async fn recording_usage_for_unknown_coupon_fails() {
    let app = TestApp::new().await;

    let err = app
        .coupons()
        .record_coupon_usage(RecordUsageInput::new(Uuid::new_v4(), dec!(1)))
        .await
        .unwrap_err();

    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn redeem_records_the_computed_discount() {
    let app = TestApp::new().await;
    let mut input = percentage("REDEEM", dec!(10));
    input.max_uses_per_customer = Some(1);
    let coupon = app.seed_coupon(input).await;

    let redeem = || RedeemCouponInput {
        validation: for_user("redeem", dec!(99.99), "user-1"),
        order_id: Some("order-1".to_string()),
    };

    let usage = app.coupons().redeem_coupon(redeem()).await.unwrap();
    assert_eq!(usage.coupon_id, coupon.id);
    assert_eq!(usage.discount, dec!(10.00));
    assert_eq!(usage.user_id.as_deref(), Some("user-1"));
    assert_eq!(usage.order_id.as_deref(), Some("order-1"));

    let err = app.coupons().redeem_coupon(redeem()).await.unwrap_err();
    assert_matches!(err, ServiceError::Conflict(msg) if msg.contains("per customer"));

    let usages = app.coupons().list_usages(coupon.id).await.unwrap();
    assert_eq!(usages.len(), 1);
}

#[tokio::test]
async fn redeem_unknown_code_is_not_found() {
    let app = TestApp::new().await;

    let err = app
        .coupons()
        .redeem_coupon(RedeemCouponInput {
            validation: order("MISSING", dec!(10)),
            order_id: None,
        })
        .await
        .unwrap_err();

    assert_matches!(err, ServiceError::NotFound(msg) if msg == "Coupon code not found");
}

#[tokio::test]
async fn duplicate_code_conflicts_after_normalization() {
    let app = TestApp::new().await;
    app.seed_coupon(fixed("DUP", dec!(5))).await;

    let err = app
        .coupons()
        .create_coupon(fixed(" dup ", dec!(7)))
        .await
        .unwrap_err();

    assert_matches!(err, ServiceError::Conflict(msg) if msg == "Coupon code already exists");
}

#[tokio::test]
async fn create_applies_defaults_and_rejects_bad_terms() {
    let app = TestApp::new().await;

    let coupon = app.seed_coupon(percentage("DEFAULTS", dec!(10))).await;
    assert_eq!(coupon.min_order_value, dec!(0));
    assert_eq!(coupon.max_uses_per_customer, 1);
    assert!(coupon.is_active);
    assert!(coupon.applicable_products.is_empty());

    let err = app
        .coupons()
        .create_coupon(percentage("TOOMUCH", dec!(150)))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));

    let err = app
        .coupons()
        .create_coupon(fixed("ZERO", dec!(0)))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));
}

#[tokio::test]
async fn update_changes_only_supplied_fields() {
    let app = TestApp::new().await;
    let mut input = percentage("PATCH", dec!(10));
    input.max_discount = Some(dec!(20));
    input.description = Some("spring sale".to_string());
    let coupon = app.seed_coupon(input).await;

    let updated = app
        .coupons()
        .update_coupon(
            coupon.id,
            UpdateCouponInput {
                code: Some("patched".to_string()),
                max_discount: Some(None),
                discount_type: Some(DiscountType::Fixed),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.code, "PATCHED");
    assert_eq!(updated.max_discount, None);
    assert_eq!(updated.discount_type, DiscountType::Fixed);
    assert_eq!(updated.description.as_deref(), Some("spring sale"));
    assert_eq!(updated.discount_value, dec!(10));

    let fetched = app.coupons().get_coupon(coupon.id).await.unwrap();
    assert_eq!(fetched.code, "PATCHED");
}

#[tokio::test]
async fn update_to_taken_code_conflicts() {
    let app = TestApp::new().await;
    app.seed_coupon(fixed("TAKEN", dec!(5))).await;
    let other = app.seed_coupon(fixed("FREE", dec!(5))).await;

    let err = app
        .coupons()
        .update_coupon(
            other.id,
            UpdateCouponInput {
                code: Some("taken".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert_matches!(err, ServiceError::Conflict(_));
}

#[tokio::test]
async fn delete_is_refused_once_redeemed() {
    let app = TestApp::new().await;
    let unused = app.seed_coupon(fixed("UNUSED", dec!(5))).await;
    let used = app.seed_coupon(fixed("USED", dec!(5))).await;
    app.coupons()
        .record_coupon_usage(RecordUsageInput::new(used.id, dec!(5)))
        .await
        .unwrap();

    app.coupons().delete_coupon(unused.id).await.unwrap();
    assert_matches!(
        app.coupons().get_coupon(unused.id).await,
        Err(ServiceError::NotFound(_))
    );

    assert_matches!(
        app.coupons().delete_coupon(used.id).await,
        Err(ServiceError::Conflict(_))
    );
    assert_matches!(
        app.coupons().delete_coupon(Uuid::new_v4()).await,
        Err(ServiceError::NotFound(_))
    );
}

#[tokio::test]
async fn list_coupons_paginates() {
    let app = TestApp::new().await;
    for i in 0..5 {
        app.seed_coupon(fixed(&format!("LIST{i}"), dec!(1))).await;
    }

    let first = app.coupons().list_coupons(1, 2).await.unwrap();
    assert_eq!(first.total, 5);
    assert_eq!(first.coupons.len(), 2);

    let last = app.coupons().list_coupons(3, 2).await.unwrap();
    assert_eq!(last.coupons.len(), 1);

    let beyond = app.coupons().list_coupons(4, 2).await.unwrap();
    assert!(beyond.coupons.is_empty());
}

#[tokio::test]
async fn list_usages_of_unknown_coupon_is_not_found() {
    let app = TestApp::new().await;

    assert_matches!(
        app.coupons().list_usages(Uuid::new_v4()).await,
        Err(ServiceError::NotFound(_))
    );
}

#[tokio::test]
async fn oversized_order_total_is_rejected_instead_of_overflowing() {
    let app = TestApp::new().await;
    let coupon = app.seed_coupon(percentage("ALL", dec!(100))).await;
    let total = rust_decimal::Decimal::from_str_exact("1000000000000000013287555072").unwrap();

    let result = app.coupons().validate_coupon(&order("ALL", total)).await;
    assert!(!result.valid);
    assert_eq!(result.message, "Order total is out of range");
    assert!(result.discount.is_none());

    let err = app
        .coupons()
        .redeem_coupon(RedeemCouponInput {
            validation: for_user("ALL", total, "user-big"),
            order_id: None,
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Conflict(_));
    assert!(app.coupons().list_usages(coupon.id).await.unwrap().is_empty());
}
