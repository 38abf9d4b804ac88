use crate::handlers::common::{
    created_response, double_option, json_body, map_service_error, no_content_response,
    success_response, validate_input, PaginatedResponse, PaginationParams,
};
use crate::{
    entities::{CouponModel, CouponUsageModel, DiscountType},
    errors::{ApiError, ServiceError},
    services::coupon_policy::ORDER_TOTAL_LIMIT,
    services::coupons::{
        CouponValidation, CreateCouponInput, RecordUsageInput, RedeemCouponInput,
        UpdateCouponInput, ValidateCouponInput,
    },
    AppState,
};
use axum::{
    extract::{rejection::JsonRejection, Json, Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Creates the router for coupon endpoints
pub fn coupons_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_coupon).get(list_coupons))
        .route("/validate", post(validate_coupon))
        .route("/redeem", post(redeem_coupon))
        .route("/usages", post(record_usage))
        .route(
            "/{id}",
            get(get_coupon).put(update_coupon).delete(delete_coupon),
        )
        .route("/{id}/usages", get(list_usages))
}

/// Validate a coupon code against an order
///
/// Business-rule rejections are a normal outcome: they come back as 200 with `valid: false`.
#[utoipa::path(
    post,
    path = "/api/v1/coupons/validate",
    summary = "Validate coupon",
    request_body = ValidateCouponRequest,
    responses(
        (status = 200, description = "Validation outcome", body = CouponValidationResponse),
        (status = 400, description = "Code or order total missing or out of range", body = crate::errors::ErrorResponse),
    ),
    tag = "Coupons"
)]
pub async fn validate_coupon(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ValidateCouponRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let input = json_body(payload)?.into_input()?;
    let outcome = state.services.coupons.validate_coupon(&input).await;
    Ok(success_response(CouponValidationResponse::from(outcome)))
}

/// Create a coupon
#[utoipa::path(
    post,
    path = "/api/v1/coupons",
    summary = "Create coupon",
    request_body = CreateCouponRequest,
    responses(
        (status = 201, description = "Coupon created", body = CouponResponse),
        (status = 400, description = "Invalid coupon terms", body = crate::errors::ErrorResponse),
        (status = 409, description = "Coupon code already exists", body = crate::errors::ErrorResponse),
        (status = 500, description = "Store failure, cause in `details`", body = crate::errors::ErrorResponse),
    ),
    tag = "Coupons"
)]
pub async fn create_coupon(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateCouponRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = json_body(payload)?;
    validate_input(&payload)?;

    let coupon = state
        .services
        .coupons
        .create_coupon(payload.into())
        .await
        .map_err(|err| match err {
            ServiceError::Conflict(_)
            | ServiceError::ValidationError(_)
            | ServiceError::InvalidInput(_) => map_service_error(err),
            other => {
                error!(error = %other, "Failed to create coupon");
                ApiError::InternalWithDetails {
                    message: "Failed to create coupon".to_string(),
                    details: other.to_string(),
                }
            }
        })?;

    Ok(created_response(CouponResponse::from(coupon)))
}

/// List coupons, newest first
#[utoipa::path(
    get,
    path = "/api/v1/coupons",
    summary = "List coupons",
    params(PaginationParams),
    responses(
        (status = 200, description = "Coupons retrieved", body = PaginatedResponse<CouponResponse>),
    ),
    tag = "Coupons"
)]
pub async fn list_coupons(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (page, per_page) = params.resolve(
        state.config.api_default_page_size,
        state.config.api_max_page_size,
    );

    let listing = state
        .services
        .coupons
        .list_coupons(page, per_page)
        .await
        .map_err(map_service_error)?;

    let coupons = listing.coupons.into_iter().map(CouponResponse::from).collect();
    Ok(success_response(PaginatedResponse::new(
        coupons,
        listing.page,
        listing.per_page,
        listing.total,
    )))
}

/// Get a coupon by id
#[utoipa::path(
    get,
    path = "/api/v1/coupons/{id}",
    summary = "Get coupon",
    params(("id" = Uuid, Path, description = "Coupon id")),
    responses(
        (status = 200, description = "Coupon retrieved", body = CouponResponse),
        (status = 404, description = "Coupon not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Coupons"
)]
pub async fn get_coupon(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let coupon = state
        .services
        .coupons
        .get_coupon(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(CouponResponse::from(coupon)))
}

/// Partially update a coupon
#[utoipa::path(
    put,
    path = "/api/v1/coupons/{id}",
    summary = "Update coupon",
    params(("id" = Uuid, Path, description = "Coupon id")),
    request_body = UpdateCouponRequest,
    responses(
        (status = 200, description = "Coupon updated", body = CouponResponse),
        (status = 400, description = "Invalid coupon terms", body = crate::errors::ErrorResponse),
        (status = 404, description = "Coupon not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Coupon code already exists", body = crate::errors::ErrorResponse),
    ),
    tag = "Coupons"
)]
pub async fn update_coupon(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateCouponRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = json_body(payload)?;
    validate_input(&payload)?;

    let coupon = state
        .services
        .coupons
        .update_coupon(id, payload.into())
        .await
        .map_err(map_service_error)?;

    Ok(success_response(CouponResponse::from(coupon)))
}

/// Delete a coupon that has never been redeemed
#[utoipa::path(
    delete,
    path = "/api/v1/coupons/{id}",
    summary = "Delete coupon",
    params(("id" = Uuid, Path, description = "Coupon id")),
    responses(
        (status = 204, description = "Coupon deleted"),
        (status = 404, description = "Coupon not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Coupon has recorded usages", body = crate::errors::ErrorResponse),
    ),
    tag = "Coupons"
)]
pub async fn delete_coupon(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .coupons
        .delete_coupon(id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

/// Redemption history of a coupon
#[utoipa::path(
    get,
    path = "/api/v1/coupons/{id}/usages",
    summary = "List coupon usages",
    params(("id" = Uuid, Path, description = "Coupon id")),
    responses(
        (status = 200, description = "Usages, oldest first", body = Vec<CouponUsageResponse>),
        (status = 404, description = "Coupon not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Coupons"
)]
pub async fn list_usages(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let usages = state
        .services
        .coupons
        .list_usages(id)
        .await
        .map_err(map_service_error)?;

    let usages: Vec<CouponUsageResponse> =
        usages.into_iter().map(CouponUsageResponse::from).collect();
    Ok(success_response(usages))
}

/// Record a redemption without re-validating
#[utoipa::path(
    post,
    path = "/api/v1/coupons/usages",
    summary = "Record coupon usage",
    request_body = RecordUsageRequest,
    responses(
        (status = 201, description = "Usage recorded", body = CouponUsageResponse),
        (status = 400, description = "Invalid usage", body = crate::errors::ErrorResponse),
        (status = 404, description = "Coupon not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Coupons"
)]
pub async fn record_usage(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RecordUsageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = json_body(payload)?;
    validate_input(&payload)?;
    if payload.discount < Decimal::ZERO {
        return Err(ApiError::bad_request("Discount must not be negative"));
    }
    if payload.discount >= ORDER_TOTAL_LIMIT {
        return Err(ApiError::bad_request("Discount is out of range"));
    }

    let usage = state
        .services
        .coupons
        .record_coupon_usage(payload.into())
        .await
        .map_err(map_service_error)?;

    Ok(created_response(CouponUsageResponse::from(usage)))
}

/// Validate and record a redemption atomically
#[utoipa::path(
    post,
    path = "/api/v1/coupons/redeem",
    summary = "Redeem coupon",
    request_body = RedeemCouponRequest,
    responses(
        (status = 201, description = "Coupon redeemed", body = CouponUsageResponse),
        (status = 400, description = "Code or order total missing", body = crate::errors::ErrorResponse),
        (status = 404, description = "Coupon code not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Coupon no longer applies to this order", body = crate::errors::ErrorResponse),
    ),
    tag = "Coupons"
)]
pub async fn redeem_coupon(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RedeemCouponRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let RedeemCouponRequest { order, order_id } = json_body(payload)?;
    let input = RedeemCouponInput {
        validation: order.into_input()?,
        order_id,
    };

    let usage = state
        .services
        .coupons
        .redeem_coupon(input)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(CouponUsageResponse::from(usage)))
}

// Request DTOs

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCouponRequest {
    #[schema(example = "SUMMER10")]
    pub code: Option<String>,
    #[schema(value_type = Option<f64>, example = 120.5)]
    pub order_total: Option<Decimal>,
    pub user_id: Option<String>,
    #[validate(email)]
    pub guest_email: Option<String>,
    pub product_ids: Option<Vec<String>>,
    pub category_ids: Option<Vec<String>>,
}

impl ValidateCouponRequest {
    fn into_input(self) -> Result<ValidateCouponInput, ApiError> {
        validate_input(&self)?;
        let code = self.code.filter(|code| !code.trim().is_empty());
        let (Some(code), Some(order_total)) = (code, self.order_total) else {
            return Err(ApiError::bad_request(
                "Coupon code and order total are required",
            ));
        };
        if order_total < Decimal::ZERO {
            return Err(ApiError::bad_request("Order total must not be negative"));
        }
        if order_total >= ORDER_TOTAL_LIMIT {
            return Err(ApiError::bad_request("Order total is out of range"));
        }

        Ok(ValidateCouponInput {
            code,
            order_total,
            user_id: self.user_id,
            guest_email: self.guest_email,
            product_ids: self.product_ids,
            category_ids: self.category_ids,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedeemCouponRequest {
    #[serde(flatten)]
    pub order: ValidateCouponRequest,
    pub order_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCouponRequest {
    #[validate(length(min = 1, max = 64))]
    #[schema(example = "SUMMER10")]
    pub code: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub discount_type: DiscountType,
    #[schema(value_type = f64, example = 10)]
    pub discount_value: Decimal,
    #[schema(value_type = Option<f64>)]
    pub max_discount: Option<Decimal>,
    #[schema(value_type = Option<f64>)]
    pub min_order_value: Option<Decimal>,
    #[validate(range(min = 1))]
    pub max_uses: Option<i32>,
    #[validate(range(min = 1))]
    pub max_uses_per_customer: Option<i32>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
    pub applicable_products: Option<Vec<String>>,
    pub applicable_categories: Option<Vec<String>>,
}

impl From<CreateCouponRequest> for CreateCouponInput {
    fn from(req: CreateCouponRequest) -> Self {
        Self {
            code: req.code,
            description: req.description,
            discount_type: req.discount_type,
            discount_value: req.discount_value,
            max_discount: req.max_discount,
            min_order_value: req.min_order_value,
            max_uses: req.max_uses,
            max_uses_per_customer: req.max_uses_per_customer,
            expiry_date: req.expiry_date,
            is_active: req.is_active,
            applicable_products: req.applicable_products,
            applicable_categories: req.applicable_categories,
        }
    }
}

/// Fields left out are unchanged; `null` clears a nullable field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCouponRequest {
    #[validate(length(min = 1, max = 64))]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub discount_type: Option<DiscountType>,
    #[schema(value_type = Option<f64>)]
    pub discount_value: Option<Decimal>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub max_discount: Option<Option<Decimal>>,
    #[schema(value_type = Option<f64>)]
    pub min_order_value: Option<Decimal>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub max_uses: Option<Option<i32>>,
    #[validate(range(min = 1))]
    pub max_uses_per_customer: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub expiry_date: Option<Option<DateTime<Utc>>>,
    pub is_active: Option<bool>,
    pub applicable_products: Option<Vec<String>>,
    pub applicable_categories: Option<Vec<String>>,
}

impl From<UpdateCouponRequest> for UpdateCouponInput {
    fn from(req: UpdateCouponRequest) -> Self {
        Self {
            code: req.code,
            description: req.description,
            discount_type: req.discount_type,
            discount_value: req.discount_value,
            max_discount: req.max_discount,
            min_order_value: req.min_order_value,
            max_uses: req.max_uses,
            max_uses_per_customer: req.max_uses_per_customer,
            expiry_date: req.expiry_date,
            is_active: req.is_active,
            applicable_products: req.applicable_products,
            applicable_categories: req.applicable_categories,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordUsageRequest {
    pub coupon_id: Uuid,
    #[schema(value_type = f64)]
    pub discount: Decimal,
    pub user_id: Option<String>,
    #[validate(email)]
    pub guest_email: Option<String>,
    pub order_id: Option<String>,
}

impl From<RecordUsageRequest> for RecordUsageInput {
    fn from(req: RecordUsageRequest) -> Self {
        Self {
            coupon_id: req.coupon_id,
            discount: req.discount,
            user_id: req.user_id,
            guest_email: req.guest_email,
            order_id: req.order_id,
        }
    }
}

// Response DTOs

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CouponValidationResponse {
    pub valid: bool,
    #[schema(example = "Coupon applied successfully")]
    pub message: String,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<f64>, example = 12.05)]
    pub discount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_id: Option<Uuid>,
}

impl From<CouponValidation> for CouponValidationResponse {
    fn from(outcome: CouponValidation) -> Self {
        Self {
            valid: outcome.valid,
            message: outcome.message,
            discount: outcome.discount,
            coupon_id: outcome.coupon_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CouponResponse {
    pub id: Uuid,
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub discount_value: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub max_discount: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub min_order_value: Decimal,
    pub max_uses: Option<i32>,
    pub max_uses_per_customer: i32,
    pub expiry_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub applicable_products: Vec<String>,
    pub applicable_categories: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CouponModel> for CouponResponse {
    fn from(model: CouponModel) -> Self {
        Self {
            id: model.id,
            code: model.code,
            description: model.description,
            discount_type: model.discount_type,
            discount_value: model.discount_value.normalize(),
            max_discount: model.max_discount.map(|cap| cap.normalize()),
            min_order_value: model.min_order_value.normalize(),
            max_uses: model.max_uses,
            max_uses_per_customer: model.max_uses_per_customer,
            expiry_date: model.expiry_date,
            is_active: model.is_active,
            applicable_products: model.applicable_products.0,
            applicable_categories: model.applicable_categories.0,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CouponUsageResponse {
    pub id: Uuid,
    pub coupon_id: Uuid,
    pub user_id: Option<String>,
    pub guest_email: Option<String>,
    pub order_id: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub discount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<CouponUsageModel> for CouponUsageResponse {
    fn from(model: CouponUsageModel) -> Self {
        Self {
            id: model.id,
            coupon_id: model.coupon_id,
            user_id: model.user_id,
            guest_email: model.guest_email,
            order_id: model.order_id,
            discount: model.discount.normalize(),
            created_at: model.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    #[test]
    fn validate_request_requires_code_and_total() {
        let missing_total = ValidateCouponRequest {
            code: Some("SAVE".into()),
            ..Default::default()
        };
        assert_matches!(missing_total.into_input(), Err(ApiError::BadRequest { .. }));

        let blank_code = ValidateCouponRequest {
            code: Some("   ".into()),
            order_total: Some(dec!(10)),
            ..Default::default()
        };
        assert_matches!(blank_code.into_input(), Err(ApiError::BadRequest { .. }));

        let negative = ValidateCouponRequest {
            code: Some("SAVE".into()),
            order_total: Some(dec!(-1)),
            ..Default::default()
        };
        assert_matches!(negative.into_input(), Err(ApiError::BadRequest { .. }));

        let huge = ValidateCouponRequest {
            code: Some("SAVE".into()),
            order_total: Some(ORDER_TOTAL_LIMIT),
            ..Default::default()
        };
        assert_matches!(huge.into_input(), Err(ApiError::BadRequest { .. }));
    }

    #[test]
    fn validate_request_checks_guest_email_like_record() {
        let malformed = ValidateCouponRequest {
            code: Some("SAVE".into()),
            order_total: Some(dec!(10)),
            guest_email: Some("not-an-email".into()),
            ..Default::default()
        };
        assert_matches!(malformed.into_input(), Err(ApiError::ValidationError(_)));

        let record = RecordUsageRequest {
            coupon_id: Uuid::nil(),
            discount: dec!(1),
            user_id: None,
            guest_email: Some("not-an-email".into()),
            order_id: None,
        };
        assert!(record.validate().is_err());
    }

    #[test]
    fn validate_request_accepts_camel_case_numbers() {
        let req: ValidateCouponRequest = serde_json::from_str(
            r#"{"code":"save10","orderTotal":99.99,"guestEmail":"a@b.co","productIds":["p1"]}"#,
        )
        .unwrap();
        let input = req.into_input().unwrap();
        assert_eq!(input.order_total, dec!(99.99));
        assert_eq!(input.guest_email.as_deref(), Some("a@b.co"));
        assert_eq!(input.product_ids, Some(vec!["p1".to_string()]));
    }

    #[test]
    fn validation_response_omits_absent_fields_and_uses_numbers() {
        let rejected = serde_json::to_value(CouponValidationResponse {
            valid: false,
            message: "Coupon has expired".into(),
            discount: None,
            coupon_id: None,
        })
        .unwrap();
        assert_eq!(
            rejected,
            serde_json::json!({"valid": false, "message": "Coupon has expired"})
        );

        let accepted = serde_json::to_value(CouponValidationResponse {
            valid: true,
            message: "Coupon applied successfully".into(),
            discount: Some(dec!(12.05)),
            coupon_id: Some(Uuid::nil()),
        })
        .unwrap();
        assert_eq!(accepted["discount"], serde_json::json!(12.05));
        assert_eq!(accepted["couponId"], serde_json::json!(Uuid::nil()));
    }

    #[test]
    fn update_request_distinguishes_null_from_missing() {
        let req: UpdateCouponRequest =
            serde_json::from_str(r#"{"maxDiscount":null,"isActive":false}"#).unwrap();
        assert_eq!(req.max_discount, Some(None));
        assert_eq!(req.expiry_date, None);
        assert_eq!(req.is_active, Some(false));
    }
}
