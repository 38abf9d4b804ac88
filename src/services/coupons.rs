use crate::{
    entities::{
        coupon::{self, DiscountType, ScopeIds},
        coupon_usage, Coupon, CouponModel, CouponUsage, CouponUsageModel,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::coupon_policy::{self, CouponRejection, OrderContext, UsageCounts},
};
use chrono::{DateTime, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Select, Set, SqlErr,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

const DUPLICATE_CODE_MESSAGE: &str = "Coupon code already exists";
const VALIDATION_ERROR_MESSAGE: &str = "Error validating coupon";
const VALIDATION_SUCCESS_MESSAGE: &str = "Coupon applied successfully";
const MAX_CODE_LENGTH: usize = 64;

/// Coupon policy engine backed by the relational store.
///
/// Validation is read-only and never fails: business-rule rejections and
/// store outages both come back as an invalid [`CouponValidation`].
/// Recording a usage is a separate call whose failures propagate, since a
/// lost usage row would let a coupon be reused past its limits.
///
/// # Examples
///
/// ```ignore
/// let coupons = CouponService::new(db, event_sender);
///
/// let result = coupons
///     .validate_coupon(&ValidateCouponInput::new("SUMMER10", dec!(120)))
///     .await;
/// if let (true, Some(coupon_id), Some(discount)) =
///     (result.valid, result.coupon_id, result.discount)
/// {
///     coupons
///         .record_coupon_usage(RecordUsageInput::new(coupon_id, discount))
///         .await?;
/// }
/// ```
#[derive(Clone)]
pub struct CouponService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

/// Order context a coupon is validated against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidateCouponInput {
    pub code: String,
    pub order_total: Decimal,
    pub user_id: Option<String>,
    pub guest_email: Option<String>,
    pub product_ids: Option<Vec<String>>,
    pub category_ids: Option<Vec<String>>,
}

impl ValidateCouponInput {
    pub fn new(code: impl Into<String>, order_total: Decimal) -> Self {
        Self {
            code: code.into(),
            order_total,
            ..Default::default()
        }
    }

    fn order_context(&self) -> OrderContext<'_> {
        OrderContext {
            order_total: self.order_total,
            product_ids: self.product_ids.as_deref(),
            category_ids: self.category_ids.as_deref(),
        }
    }

    fn identity(&self) -> RedeemerIdentity<'_> {
        RedeemerIdentity::resolve(self.user_id.as_deref(), self.guest_email.as_deref())
    }
}

/// Outcome of [`CouponService::validate_coupon`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouponValidation {
    pub valid: bool,
    pub message: String,
    pub discount: Option<Decimal>,
    pub coupon_id: Option<Uuid>,
}

impl CouponValidation {
    fn accepted(coupon_id: Uuid, discount: Decimal) -> Self {
        Self {
            valid: true,
            message: VALIDATION_SUCCESS_MESSAGE.to_string(),
            discount: Some(discount),
            coupon_id: Some(coupon_id),
        }
    }

    fn rejected(rejection: &CouponRejection) -> Self {
        Self {
            valid: false,
            message: rejection.to_string(),
            discount: None,
            coupon_id: None,
        }
    }

    fn failed() -> Self {
        Self {
            valid: false,
            message: VALIDATION_ERROR_MESSAGE.to_string(),
            discount: None,
            coupon_id: None,
        }
    }
}

/// Who a per-customer limit is counted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedeemerIdentity<'a> {
    User(&'a str),
    Guest(&'a str),
    /// Neither identity supplied; per-customer counts cover every usage of the coupon.
    Anonymous,
}

impl<'a> RedeemerIdentity<'a> {
    /// `user_id` wins over `guest_email`; blank values are ignored.
    pub fn resolve(user_id: Option<&'a str>, guest_email: Option<&'a str>) -> Self {
        let present = |value: Option<&'a str>| value.map(str::trim).filter(|v| !v.is_empty());
        match (present(user_id), present(guest_email)) {
            (Some(user_id), _) => Self::User(user_id),
            (None, Some(email)) => Self::Guest(email),
            (None, None) => Self::Anonymous,
        }
    }

    fn scope(self, query: Select<CouponUsage>) -> Select<CouponUsage> {
        match self {
            Self::User(user_id) => query.filter(coupon_usage::Column::UserId.eq(user_id)),
            Self::Guest(email) => query.filter(coupon_usage::Column::GuestEmail.eq(email)),
            Self::Anonymous => query,
        }
    }
}

/// Redemption to append as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordUsageInput {
    pub coupon_id: Uuid,
    pub discount: Decimal,
    pub user_id: Option<String>,
    pub guest_email: Option<String>,
    pub order_id: Option<String>,
}

impl RecordUsageInput {
    pub fn new(coupon_id: Uuid, discount: Decimal) -> Self {
        Self {
            coupon_id,
            discount,
            user_id: None,
            guest_email: None,
            order_id: None,
        }
    }
}

/// Validation and redemption in one transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedeemCouponInput {
    pub validation: ValidateCouponInput,
    pub order_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCouponInput {
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub max_discount: Option<Decimal>,
    pub min_order_value: Option<Decimal>,
    pub max_uses: Option<i32>,
    pub max_uses_per_customer: Option<i32>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
    pub applicable_products: Option<Vec<String>>,
    pub applicable_categories: Option<Vec<String>>,
}

impl CreateCouponInput {
    pub fn new(code: impl Into<String>, discount_type: DiscountType, discount_value: Decimal) -> Self {
        Self {
            code: code.into(),
            description: None,
            discount_type,
            discount_value,
            max_discount: None,
            min_order_value: None,
            max_uses: None,
            max_uses_per_customer: None,
            expiry_date: None,
            is_active: None,
            applicable_products: None,
            applicable_categories: None,
        }
    }
}

/// Partial update. For nullable columns the outer `Option` says whether the
/// field was sent, the inner one whether it is being cleared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateCouponInput {
    pub code: Option<String>,
    pub description: Option<Option<String>>,
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<Decimal>,
    pub max_discount: Option<Option<Decimal>>,
    pub min_order_value: Option<Decimal>,
    pub max_uses: Option<Option<i32>>,
    pub max_uses_per_customer: Option<i32>,
    pub expiry_date: Option<Option<DateTime<Utc>>>,
    pub is_active: Option<bool>,
    pub applicable_products: Option<Vec<String>>,
    pub applicable_categories: Option<Vec<String>>,
}

/// One page of coupons.
#[derive(Debug, Clone, Serialize)]
pub struct CouponPage {
    pub coupons: Vec<CouponModel>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

impl CouponService {
    /// Creates a new `CouponService` instance.
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Checks a coupon code against an order and computes its discount.
    ///
    /// Never returns an error. Store failures are logged and reported as
    /// an invalid result with a generic message.
    #[instrument(skip(self, input), fields(code = %input.code, order_total = %input.order_total))]
    pub async fn validate_coupon(&self, input: &ValidateCouponInput) -> CouponValidation {
        match self.evaluate_input(input).await {
            Ok(Ok((coupon_id, discount))) => {
                counter!("storefront_coupons.validation.accepted", 1);
                debug!(%coupon_id, %discount, "coupon accepted");
                CouponValidation::accepted(coupon_id, discount)
            }
            Ok(Err(rejection)) => {
                counter!(
                    "storefront_coupons.validation.rejected",
                    1,
                    "reason" => rejection.reason()
                );
                debug!(reason = rejection.reason(), "coupon rejected");
                CouponValidation::rejected(&rejection)
            }
            Err(err) => {
                counter!("storefront_coupons.validation.error", 1);
                error!(error = %err, "coupon validation failed");
                CouponValidation::failed()
            }
        }
    }

    async fn evaluate_input(
        &self,
        input: &ValidateCouponInput,
    ) -> Result<Result<(Uuid, Decimal), CouponRejection>, ServiceError> {
        let Some(coupon) = find_by_code(&*self.db, &input.code).await? else {
            return Ok(Err(CouponRejection::NotFound));
        };

        let now = Utc::now();
        // Eligibility before usage counts.
        if let Err(rejection) = coupon_policy::check_eligibility(&coupon, input.order_total, now) {
            return Ok(Err(rejection));
        }

        let usage = usage_counts(&*self.db, &coupon, input.identity()).await?;
        Ok(coupon_policy::evaluate(&coupon, &usage, &input.order_context(), now)
            .map(|discount| (coupon.id, discount)))
    }

    /// Appends a usage row. Limits are not re-checked; callers validate first.
    ///
    /// # Errors
    ///
    /// * `ServiceError::NotFound` - the coupon does not exist
    /// * `ServiceError::DatabaseError` - the row could not be written
    #[instrument(skip(self, input), fields(coupon_id = %input.coupon_id))]
    pub async fn record_coupon_usage(
        &self,
        input: RecordUsageInput,
    ) -> Result<CouponUsageModel, ServiceError> {
        let usage = new_usage(
            input.coupon_id,
            input.discount,
            input.user_id,
            input.guest_email,
            input.order_id,
        )
        .insert(&*self.db)
        .await
        .map_err(|e| usage_insert_error(e, input.coupon_id))?;

        self.after_redemption(&usage).await;
        Ok(usage)
    }

    /// Re-validates and records a usage inside one transaction.
    ///
    /// The discount stored is the one computed in the transaction, not one
    /// supplied by the caller.
    ///
    /// # Errors
    ///
    /// * `ServiceError::NotFound` - no coupon has this code
    /// * `ServiceError::Conflict` - the coupon no longer applies to this order
    /// * `ServiceError::DatabaseError` - transaction failure
    #[instrument(skip(self, input), fields(code = %input.validation.code))]
    pub async fn redeem_coupon(
        &self,
        input: RedeemCouponInput,
    ) -> Result<CouponUsageModel, ServiceError> {
        let RedeemCouponInput { validation, order_id } = input;
        let txn = self.db.begin().await?;

        let coupon = find_by_code(&txn, &validation.code)
            .await?
            .ok_or_else(|| ServiceError::NotFound(CouponRejection::NotFound.to_string()))?;

        let usage = usage_counts(&txn, &coupon, validation.identity()).await?;
        let discount =
            coupon_policy::evaluate(&coupon, &usage, &validation.order_context(), Utc::now())
                .map_err(|rejection| {
                    counter!(
                        "storefront_coupons.redemption.rejected",
                        1,
                        "reason" => rejection.reason()
                    );
                    ServiceError::Conflict(rejection.to_string())
                })?;

        let identity = validation.identity();
        let (user_id, guest_email) = match identity {
            RedeemerIdentity::User(user_id) => (Some(user_id.to_string()), None),
            RedeemerIdentity::Guest(email) => (None, Some(email.to_string())),
            RedeemerIdentity::Anonymous => (None, None),
        };

        let usage = new_usage(coupon.id, discount, user_id, guest_email, order_id)
            .insert(&txn)
            .await
            .map_err(|e| usage_insert_error(e, coupon.id))?;
        txn.commit().await?;

        self.after_redemption(&usage).await;
        Ok(usage)
    }

    async fn after_redemption(&self, usage: &CouponUsageModel) {
        counter!("storefront_coupons.redemption.recorded", 1);
        info!(coupon_id = %usage.coupon_id, usage_id = %usage.id, discount = %usage.discount, "coupon usage recorded");
        self.event_sender
            .send_or_log(Event::CouponRedeemed {
                coupon_id: usage.coupon_id,
                usage_id: usage.id,
                discount: usage.discount,
                order_id: usage.order_id.clone(),
            })
            .await;
    }

    /// Creates a coupon, applying defaults for omitted fields.
    ///
    /// # Errors
    ///
    /// * `ServiceError::ValidationError` - inconsistent discount terms
    /// * `ServiceError::Conflict` - the normalized code is already taken
    /// * `ServiceError::DatabaseError` - any other store failure
    #[instrument(skip(self, input), fields(code = %input.code))]
    pub async fn create_coupon(&self, input: CreateCouponInput) -> Result<CouponModel, ServiceError> {
        let now = Utc::now();
        let model = CouponModel {
            id: Uuid::new_v4(),
            code: coupon_policy::normalize_code(&input.code),
            description: input.description,
            discount_type: input.discount_type,
            discount_value: input.discount_value,
            max_discount: input.max_discount,
            min_order_value: input.min_order_value.unwrap_or(Decimal::ZERO),
            max_uses: input.max_uses,
            max_uses_per_customer: input.max_uses_per_customer.unwrap_or(1),
            expiry_date: input.expiry_date,
            is_active: input.is_active != Some(false),
            applicable_products: ScopeIds::from(input.applicable_products.unwrap_or_default()),
            applicable_categories: ScopeIds::from(input.applicable_categories.unwrap_or_default()),
            created_at: now,
            updated_at: now,
        };
        validate_terms(&model)?;

        let created = coupon::ActiveModel::from(model)
            .reset_all()
            .insert(&*self.db)
            .await
            .map_err(|e| ServiceError::from_db_unique(e, DUPLICATE_CODE_MESSAGE))?;

        self.event_sender
            .send_or_log(Event::CouponCreated {
                coupon_id: created.id,
                code: created.code.clone(),
            })
            .await;

        info!(coupon_id = %created.id, code = %created.code, "Created coupon");
        Ok(created)
    }

    /// Fetches a coupon by id.
    #[instrument(skip(self))]
    pub async fn get_coupon(&self, id: Uuid) -> Result<CouponModel, ServiceError> {
        Coupon::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| coupon_not_found(id))
    }

    /// Applies a partial update; the merged coupon is validated like a new one.
    #[instrument(skip(self, patch))]
    pub async fn update_coupon(
        &self,
        id: Uuid,
        patch: UpdateCouponInput,
    ) -> Result<CouponModel, ServiceError> {
        let mut next = self.get_coupon(id).await?;

        if let Some(code) = patch.code {
            next.code = coupon_policy::normalize_code(&code);
        }
        if let Some(description) = patch.description {
            next.description = description;
        }
        if let Some(discount_type) = patch.discount_type {
            next.discount_type = discount_type;
        }
        if let Some(discount_value) = patch.discount_value {
            next.discount_value = discount_value;
        }
        if let Some(max_discount) = patch.max_discount {
            next.max_discount = max_discount;
        }
        if let Some(min_order_value) = patch.min_order_value {
            next.min_order_value = min_order_value;
        }
        if let Some(max_uses) = patch.max_uses {
            next.max_uses = max_uses;
        }
        if let Some(max_uses_per_customer) = patch.max_uses_per_customer {
            next.max_uses_per_customer = max_uses_per_customer;
        }
        if let Some(expiry_date) = patch.expiry_date {
            next.expiry_date = expiry_date;
        }
        if let Some(is_active) = patch.is_active {
            next.is_active = is_active;
        }
        if let Some(products) = patch.applicable_products {
            next.applicable_products = ScopeIds::from(products);
        }
        if let Some(categories) = patch.applicable_categories {
            next.applicable_categories = ScopeIds::from(categories);
        }
        next.updated_at = Utc::now();
        validate_terms(&next)?;

        let mut active = coupon::ActiveModel::from(next).reset_all();
        active.id = Unchanged(id);

        let updated = active
            .update(&*self.db)
            .await
            .map_err(|e| ServiceError::from_db_unique(e, DUPLICATE_CODE_MESSAGE))?;

        self.event_sender
            .send_or_log(Event::CouponUpdated(updated.id))
            .await;
        info!(coupon_id = %updated.id, "Updated coupon");
        Ok(updated)
    }

    /// Deletes a coupon that has never been redeemed.
    ///
    /// # Errors
    ///
    /// * `ServiceError::NotFound` - unknown id
    /// * `ServiceError::Conflict` - usages reference the coupon
    #[instrument(skip(self))]
    pub async fn delete_coupon(&self, id: Uuid) -> Result<(), ServiceError> {
        let usages = CouponUsage::find()
            .filter(coupon_usage::Column::CouponId.eq(id))
            .count(&*self.db)
            .await?;
        if usages > 0 {
            return Err(ServiceError::Conflict(format!(
                "Coupon {} has {} recorded usage(s) and cannot be deleted",
                id, usages
            )));
        }

        let result = Coupon::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(coupon_not_found(id));
        }

        self.event_sender.send_or_log(Event::CouponDeleted(id)).await;
        info!(coupon_id = %id, "Deleted coupon");
        Ok(())
    }

    /// Lists coupons, newest first. `page` is 1-based.
    #[instrument(skip(self))]
    pub async fn list_coupons(&self, page: u64, per_page: u64) -> Result<CouponPage, ServiceError> {
        let page = page.max(1);
        let per_page = per_page.max(1);
        let paginator = Coupon::find()
            .order_by_desc(coupon::Column::CreatedAt)
            .order_by_asc(coupon::Column::Code)
            .paginate(&*self.db, per_page);

        let total = paginator.num_items().await?;
        let coupons = paginator.fetch_page(page - 1).await?;

        Ok(CouponPage {
            coupons,
            total,
            page,
            per_page,
        })
    }

    /// Redemption history of a coupon, oldest first.
    #[instrument(skip(self))]
    pub async fn list_usages(&self, coupon_id: Uuid) -> Result<Vec<CouponUsageModel>, ServiceError> {
        // Distinguish "unknown coupon" from "never redeemed"
        self.get_coupon(coupon_id).await?;

        let usages = CouponUsage::find()
            .filter(coupon_usage::Column::CouponId.eq(coupon_id))
            .order_by_asc(coupon_usage::Column::CreatedAt)
            .all(&*self.db)
            .await?;
        Ok(usages)
    }
}

async fn find_by_code<C: ConnectionTrait>(
    conn: &C,
    raw_code: &str,
) -> Result<Option<CouponModel>, DbErr> {
    Coupon::find()
        .filter(coupon::Column::Code.eq(coupon_policy::normalize_code(raw_code)))
        .one(conn)
        .await
}

async fn usage_counts<C: ConnectionTrait>(
    conn: &C,
    coupon: &CouponModel,
    identity: RedeemerIdentity<'_>,
) -> Result<UsageCounts, DbErr> {
    let for_coupon = || CouponUsage::find().filter(coupon_usage::Column::CouponId.eq(coupon.id));

    let total = match coupon.max_uses {
        Some(_) => for_coupon().count(conn).await?,
        None => 0,
    };
    let by_customer = identity.scope(for_coupon()).count(conn).await?;

    Ok(UsageCounts { total, by_customer })
}

fn new_usage(
    coupon_id: Uuid,
    discount: Decimal,
    user_id: Option<String>,
    guest_email: Option<String>,
    order_id: Option<String>,
) -> coupon_usage::ActiveModel {
    let non_blank = |value: Option<String>| {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    coupon_usage::ActiveModel {
        id: Set(Uuid::new_v4()),
        coupon_id: Set(coupon_id),
        user_id: Set(non_blank(user_id)),
        guest_email: Set(non_blank(guest_email)),
        order_id: Set(non_blank(order_id)),
        discount: Set(discount),
        created_at: Set(Utc::now()),
    }
}

fn usage_insert_error(err: DbErr, coupon_id: Uuid) -> ServiceError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => coupon_not_found(coupon_id),
        _ => ServiceError::DatabaseError(err),
    }
}

fn coupon_not_found(id: Uuid) -> ServiceError {
    ServiceError::NotFound(format!("Coupon {} not found", id))
}

/// Consistency rules every stored coupon satisfies.
fn validate_terms(coupon: &CouponModel) -> Result<(), ServiceError> {
    let invalid = |msg: &str| Err(ServiceError::ValidationError(msg.to_string()));

    if coupon.code.is_empty() {
        return invalid("code must not be empty");
    }
    if coupon.code.chars().count() > MAX_CODE_LENGTH {
        return invalid("code must be at most 64 characters");
    }
    if coupon.discount_value <= Decimal::ZERO {
        return invalid("discountValue must be greater than 0");
    }
    if coupon.discount_type == DiscountType::Percentage
        && coupon.discount_value > Decimal::ONE_HUNDRED
    {
        return invalid("percentage discountValue must not exceed 100");
    }
    if coupon.max_discount.is_some_and(|cap| cap < Decimal::ZERO) {
        return invalid("maxDiscount must not be negative");
    }
    if coupon.min_order_value < Decimal::ZERO {
        return invalid("minOrderValue must not be negative");
    }
    if coupon.max_uses.is_some_and(|max| max < 1) {
        return invalid("maxUses must be at least 1");
    }
    if coupon.max_uses_per_customer < 1 {
        return invalid("maxUsesPerCustomer must be at least 1");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tokio::sync::mpsc;

    fn disconnected_service() -> CouponService {
        let (tx, _rx) = mpsc::channel(8);
        CouponService::new(
            Arc::new(DatabaseConnection::default()),
            Arc::new(EventSender::new(tx)),
        )
    }

    #[tokio::test]
    async fn store_failure_downgrades_to_generic_rejection() {
        let service = disconnected_service();

        let result = service
            .validate_coupon(&ValidateCouponInput::new("SAVE10", dec!(100)))
            .await;

        assert!(!result.valid);
        assert_eq!(result.message, "Error validating coupon");
        assert!(result.discount.is_none());
        assert!(result.coupon_id.is_none());
    }

    #[tokio::test]
    async fn store_failure_while_recording_propagates() {
        let service = disconnected_service();

        let err = service
            .record_coupon_usage(RecordUsageInput::new(Uuid::new_v4(), dec!(5)))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::DatabaseError(_)));
    }

    #[test]
    fn identity_prefers_user_and_ignores_blanks() {
        assert_eq!(
            RedeemerIdentity::resolve(Some("u-1"), Some("a@b.co")),
            RedeemerIdentity::User("u-1")
        );
        assert_eq!(
            RedeemerIdentity::resolve(Some("  "), Some(" a@b.co ")),
            RedeemerIdentity::Guest("a@b.co")
        );
        assert_eq!(
            RedeemerIdentity::resolve(None, Some("")),
            RedeemerIdentity::Anonymous
        );
    }

    fn valid_model() -> CouponModel {
        CouponModel {
            id: Uuid::new_v4(),
            code: "SAVE".to_string(),
            description: None,
            discount_type: DiscountType::Percentage,
            discount_value: dec!(10),
            max_discount: None,
            min_order_value: Decimal::ZERO,
            max_uses: None,
            max_uses_per_customer: 1,
            expiry_date: None,
            is_active: true,
            applicable_products: ScopeIds::default(),
            applicable_categories: ScopeIds::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn terms_validation_rejects_inconsistent_coupons() {
        assert!(validate_terms(&valid_model()).is_ok());

        let mut c = valid_model();
        c.discount_value = dec!(120);
        assert!(matches!(
            validate_terms(&c),
            Err(ServiceError::ValidationError(_))
        ));

        let mut c = valid_model();
        c.discount_type = DiscountType::Fixed;
        c.discount_value = dec!(120);
        assert!(validate_terms(&c).is_ok());

        let mut c = valid_model();
        c.code = String::new();
        assert!(validate_terms(&c).is_err());

        let mut c = valid_model();
        c.max_uses_per_customer = 0;
        assert!(validate_terms(&c).is_err());

        let mut c = valid_model();
        c.max_uses = Some(0);
        assert!(validate_terms(&c).is_err());
    }
}
