use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::customer::{Address, CustomerId};
use super::product::ProductId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub i64);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Processing,
    Shipped,
    Delivered,
    Returned,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    BankTransfer,
    CashOnDelivery,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
    /// Unit price captured when the order was placed.
    pub price_at_purchase: Decimal,
}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        self.price_at_purchase * Decimal::from(self.quantity)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub shipping_address: Option<Address>,
    pub billing_address: Option<Address>,
    pub payment_method: Option<PaymentMethod>,
    pub items: Vec<OrderItem>,
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub tax_amount: Decimal,
    pub discount_amount: Decimal,
    pub total_price: Decimal,
    pub tracking_information: Option<String>,
}

impl Order {
    /// Recomputes `subtotal` from the items and `total_price` from the
    /// subtotal, shipping, tax and discount.
    pub fn recalculate_total(&mut self) {
        self.subtotal = self.items.iter().map(OrderItem::line_total).sum();
        self.total_price =
            self.subtotal + self.shipping_cost + self.tax_amount - self.discount_amount;
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::{Order, OrderId, OrderItem, OrderStatus};
    use crate::domain::customer::CustomerId;
    use crate::domain::product::ProductId;

    #[test]
    fn recalculate_total_applies_shipping_tax_and_discount() {
        let mut order = Order {
            id: OrderId(1),
            customer_id: CustomerId(9),
            order_date: Utc::now(),
            status: OrderStatus::Pending,
            shipping_address: None,
            billing_address: None,
            payment_method: None,
            items: vec![
                OrderItem {
                    product_id: ProductId(4),
                    quantity: 2,
                    price_at_purchase: Decimal::new(2499, 2),
                },
                OrderItem {
                    product_id: ProductId(6),
                    quantity: 1,
                    price_at_purchase: Decimal::new(3999, 2),
                },
            ],
            subtotal: Decimal::ZERO,
            shipping_cost: Decimal::new(500, 2),
            tax_amount: Decimal::new(712, 2),
            discount_amount: Decimal::new(1000, 2),
            total_price: Decimal::ZERO,
            tracking_information: None,
        };

        order.recalculate_total();

        assert_eq!(order.subtotal, Decimal::new(8997, 2));
        assert_eq!(order.total_price, Decimal::new(9209, 2));
    }
}
