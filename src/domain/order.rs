use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::cart::Cart;
use super::errors::{check_email, check_text, DomainError, ValidationErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::Internal(format!("unknown order status '{}'", other))),
        }
    }
}

/// Contact and shipping details submitted at checkout.
#[derive(Debug, Clone, Default)]
pub struct OrderDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub phone: String,
}

impl OrderDraft {
    /// Checks every field and returns the draft with surrounding whitespace trimmed.
    pub fn validate(self) -> Result<OrderDraft, DomainError> {
        let draft = OrderDraft {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            address: self.address.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            city: self.city.trim().to_string(),
            phone: self.phone.trim().to_string(),
        };

        let mut errors = ValidationErrors::new("Invalid order details");
        check_text(&mut errors, "first_name", &draft.first_name, true, 50);
        check_text(&mut errors, "last_name", &draft.last_name, true, 50);
        check_text(&mut errors, "email", &draft.email, true, 254);
        check_email(&mut errors, "email", &draft.email);
        check_text(&mut errors, "address", &draft.address, true, 250);
        check_text(&mut errors, "postal_code", &draft.postal_code, true, 20);
        check_text(&mut errors, "city", &draft.city, true, 100);
        check_text(&mut errors, "phone", &draft.phone, false, 20);
        errors.into_result()?;

        Ok(draft)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderLineInput {
    pub ingredient_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

impl OrderLineInput {
    /// Copies every cart line verbatim, refusing an empty cart.
    pub fn from_cart(cart: &Cart) -> Result<Vec<OrderLineInput>, DomainError> {
        if cart.total_quantity() <= 0 {
            return Err(DomainError::invalid("Cart is empty"));
        }
        Ok(cart
            .lines()
            .map(|(ingredient_id, line)| OrderLineInput {
                ingredient_id,
                quantity: line.quantity,
                unit_price: line.unit_price.clone(),
            })
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub id: Uuid,
    pub ingredient_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub details: OrderDraft,
    pub status: OrderStatus,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub lines: Vec<OrderLineView>,
}

impl OrderView {
    pub fn total_price(&self) -> BigDecimal {
        self.lines.iter().fold(BigDecimal::from(0), |acc, l| {
            acc + &l.unit_price * BigDecimal::from(l.quantity)
        })
    }
}

#[derive(Debug, Clone)]
pub struct ListResult {
    pub items: Vec<OrderView>,
    pub total: i64,
}
