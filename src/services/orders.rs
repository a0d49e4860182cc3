use crate::{
    entities::{
        customer,
        order::{self, Entity as OrderEntity, Model as OrderModel, OrderStatus},
        Customer, Order,
    },
    errors::ServiceError,
    services::{fetch_page, find_by_id, DeleteResponse, ListQuery, Page},
    validation::{non_negative_decimal, FieldKind, FieldSpec, RequestSchema},
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

/// `subtotal - discount`, refusing a discount larger than the subtotal.
pub fn net_total(subtotal: Decimal, discount: Decimal) -> Result<Decimal, ServiceError> {
    if discount > subtotal {
        return Err(ServiceError::invalid_field(
            "discount",
            "must not exceed subtotal",
        ));
    }
    Ok(subtotal - discount)
}

pub fn parse_status(raw: &str) -> Result<OrderStatus, ServiceError> {
    serde_json::from_value(Value::String(raw.to_lowercase()))
        .map_err(|_| ServiceError::invalid_field("status", format!("unknown status '{}'", raw)))
}

#[derive(Clone)]
pub struct OrderService {
    db: Arc<DatabaseConnection>,
}

impl OrderService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, query: &ListQuery) -> Result<Page<OrderModel>, ServiceError> {
        let mut select = OrderEntity::find().order_by_desc(order::Column::Id);
        if let Some(customer_id) = query.customer_id {
            select = select.filter(order::Column::CustomerId.eq(customer_id));
        }
        if let Some(status) = query.status.as_deref() {
            select = select.filter(order::Column::Status.eq(parse_status(status)?));
        }
        fetch_page(&self.db, select, query).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<OrderModel, ServiceError> {
        find_by_id::<OrderEntity>(&self.db, id, "Order").await
    }

    /// Orders placed by a customer, newest first.
    #[instrument(skip(self))]
    pub async fn for_customer(&self, customer_id: i32) -> Result<Vec<OrderModel>, ServiceError> {
        let customer = find_by_id::<Customer>(&self.db, customer_id, "Customer").await?;
        Ok(customer
            .find_related(Order)
            .order_by_desc(order::Column::Id)
            .all(&*self.db)
            .await?)
    }

    /// Places an order for the customer whose `user_code` equals
    /// `customer_code`.
    #[instrument(skip(self, input), fields(customer_code = %input.customer_code))]
    pub async fn create(&self, input: CreateOrderInput) -> Result<OrderModel, ServiceError> {
        let net_total = net_total(input.subtotal, input.discount)?;

        let customer = Customer::find()
            .filter(customer::Column::UserCode.eq(&input.customer_code))
            .order_by_asc(customer::Column::Id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                warn!("order rejected: unknown customer");
                ServiceError::not_found("Customer", &input.customer_code)
            })?;

        let model = order::ActiveModel {
            customer_id: Set(customer.id),
            items: Set(Value::Array(input.selected_items)),
            subtotal: Set(input.subtotal),
            discount: Set(input.discount),
            net_total: Set(net_total),
            status: Set(OrderStatus::Pending),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(id = model.id, customer_id = customer.id, "order created");
        Ok(model)
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i32, input: UpdateOrderInput) -> Result<OrderModel, ServiceError> {
        let existing = self.get(id).await?;

        let next_status = input.status.as_deref().map(parse_status).transpose()?;
        if let Some(next) = next_status {
            if next != existing.status && !existing.status.can_transition_to(next) {
                return Err(ServiceError::invalid_field(
                    "status",
                    format!(
                        "cannot move from {} to {}",
                        existing.status.as_str(),
                        next.as_str()
                    ),
                ));
            }
        }

        let subtotal = input.subtotal.unwrap_or(existing.subtotal);
        let discount = input.discount.unwrap_or(existing.discount);
        let totals_changed = input.subtotal.is_some() || input.discount.is_some();
        let net = net_total(subtotal, discount)?;

        let mut model: order::ActiveModel = existing.into();
        if totals_changed {
            model.subtotal = Set(subtotal);
            model.discount = Set(discount);
            model.net_total = Set(net);
        }
        if let Some(items) = input.selected_items {
            model.items = Set(Value::Array(items));
        }
        if let Some(status) = next_status {
            model.status = Set(status);
        }

        Ok(model.update(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<DeleteResponse, ServiceError> {
        let model = self.get(id).await?;
        model.delete(&*self.db).await?;
        info!(id, "order deleted");
        Ok(DeleteResponse::new(id))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderInput {
    #[validate(custom = "non_negative_decimal")]
    pub subtotal: Decimal,
    #[validate(custom = "non_negative_decimal")]
    pub discount: Decimal,
    #[validate(length(min = 1))]
    pub selected_items: Vec<Value>,
    #[validate(length(min = 1, max = 20))]
    pub customer_code: String,
}

impl RequestSchema for CreateOrderInput {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("subtotal", FieldKind::Number),
        FieldSpec::required("discount", FieldKind::Number),
        FieldSpec::required("selected_items", FieldKind::NonEmptyArray),
        FieldSpec::required("customer_code", FieldKind::NonEmptyString),
    ];
}

/// The customer of an order cannot change.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateOrderInput {
    #[validate(custom = "non_negative_decimal")]
    pub subtotal: Option<Decimal>,
    #[validate(custom = "non_negative_decimal")]
    pub discount: Option<Decimal>,
    #[validate(length(min = 1))]
    pub selected_items: Option<Vec<Value>>,
    pub status: Option<String>,
}

impl RequestSchema for UpdateOrderInput {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("subtotal", FieldKind::Number),
        FieldSpec::optional("discount", FieldKind::Number),
        FieldSpec::optional("selected_items", FieldKind::NonEmptyArray),
        FieldSpec::optional("status", FieldKind::NonEmptyString),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn net_total_subtracts_discount() {
        assert_eq!(net_total(dec!(100), dec!(10)).unwrap(), dec!(90));
        assert_eq!(net_total(dec!(100), dec!(100)).unwrap(), dec!(0));
        assert!(net_total(dec!(10), dec!(10.01)).is_err());
    }

    #[test]
    fn order_status_lifecycle() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Processing));
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Completed));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Processing));
        assert_eq!(parse_status("Cancelled").unwrap(), OrderStatus::Cancelled);
    }
}
