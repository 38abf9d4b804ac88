use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// How a coupon's `discount_value` is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// Percent of the order total, optionally capped by `max_discount`.
    #[sea_orm(string_value = "percentage")]
    Percentage,
    /// Absolute currency amount.
    #[sea_orm(string_value = "fixed")]
    Fixed,
}

/// Set of product or category identifiers a coupon is scoped to.
/// Empty means the coupon is not restricted on that axis.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct ScopeIds(pub Vec<String>);

impl ScopeIds {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when at least one of `ids` is part of the scope.
    pub fn intersects(&self, ids: &[String]) -> bool {
        ids.iter().any(|id| self.0.contains(id))
    }
}

impl From<Vec<String>> for ScopeIds {
    fn from(ids: Vec<String>) -> Self {
        Self(ids)
    }
}

/// Coupon entity
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "coupons")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub discount_type: DiscountType,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub discount_value: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub max_discount: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub min_order_value: Decimal,
    #[sea_orm(nullable)]
    pub max_uses: Option<i32>,
    pub max_uses_per_customer: i32,
    #[sea_orm(nullable)]
    pub expiry_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    #[sea_orm(column_type = "Json")]
    pub applicable_products: ScopeIds,
    #[sea_orm(column_type = "Json")]
    pub applicable_categories: ScopeIds,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::coupon_usage::Entity")]
    Usages,
}

impl Related<super::coupon_usage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Usages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
