use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront Coupons API",
        version = "1.0.0",
        description = r#"
# Storefront Coupons API

Coupon policy engine for a storefront checkout.

- **Validation**: check a code against an order and get the discount it earns
- **Redemption**: record usages, or validate and record atomically
- **Administration**: create, list, update and delete coupons

## Money

Amounts are JSON numbers in the store currency, rounded to two decimal places.

## Error Handling

Errors share one body shape:

```json
{
  "error": "Conflict",
  "message": "Conflict: Coupon code already exists",
  "request_id": "req-abc123xyz",
  "timestamp": "2024-01-01T00:00:00Z"
}
```

A rejected coupon is not an error: `POST /coupons/validate` answers 200 with `valid: false`.

## Pagination

`GET /coupons` takes `page` (default 1) and `per_page` (default 20, max 100).
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Coupons", description = "Coupon validation, redemption and administration")
    ),
    paths(
        crate::handlers::coupons::validate_coupon,
        crate::handlers::coupons::create_coupon,
        crate::handlers::coupons::list_coupons,
        crate::handlers::coupons::get_coupon,
        crate::handlers::coupons::update_coupon,
        crate::handlers::coupons::delete_coupon,
        crate::handlers::coupons::list_usages,
        crate::handlers::coupons::record_usage,
        crate::handlers::coupons::redeem_coupon,
    ),
    components(
        schemas(
            crate::handlers::common::PaginationMeta,
            crate::handlers::coupons::ValidateCouponRequest,
            crate::handlers::coupons::RedeemCouponRequest,
            crate::handlers::coupons::CreateCouponRequest,
            crate::handlers::coupons::UpdateCouponRequest,
            crate::handlers::coupons::RecordUsageRequest,
            crate::handlers::coupons::CouponValidationResponse,
            crate::handlers::coupons::CouponResponse,
            crate::handlers::coupons::CouponUsageResponse,
            crate::entities::DiscountType,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

/// Serves the generated document at `/api-docs/openapi.json`.
pub fn openapi_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route(
        "/api-docs/openapi.json",
        get(|| async { Json(ApiDocV1::openapi()) }),
    )
}
