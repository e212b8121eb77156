use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use relaycrm_core::{CustomerId, DomainError, DomainResult, Entity, OrderId, ProductId};
use relaycrm_customers::Customer;
use relaycrm_products::Product;

/// A persisted order.
///
/// `total_amount_cents` is the sum of the associated products' prices as they
/// existed at placement time; it is never recomputed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    customer_id: CustomerId,
    product_ids: Vec<ProductId>,
    order_date: DateTime<Utc>,
    total_amount_cents: i64,
}

impl Order {
    /// Place an order for a customer over an already-resolved product set.
    ///
    /// The resolved set must be non-empty; an empty set means the request
    /// either listed no ids or listed ids that match nothing, which is a
    /// single failure mode. The order date defaults to `now` when the
    /// request carried none.
    pub fn place(
        id: OrderId,
        customer: &Customer,
        products: &[Product],
        order_date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if products.is_empty() {
            return Err(DomainError::InvalidProducts);
        }

        let total_amount_cents = products.iter().map(Product::price_cents).sum();

        Ok(Self {
            id,
            customer_id: customer.id(),
            product_ids: products.iter().map(Entity::id).collect(),
            order_date: order_date.unwrap_or(now),
            total_amount_cents,
        })
    }

    /// Rebuild an order from stored fields. No invariant re-checks: the
    /// store is trusted to only hold orders that were placed validly.
    pub fn from_stored(
        id: OrderId,
        customer_id: CustomerId,
        product_ids: Vec<ProductId>,
        order_date: DateTime<Utc>,
        total_amount_cents: i64,
    ) -> Self {
        Self {
            id,
            customer_id,
            product_ids,
            order_date,
            total_amount_cents,
        }
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn product_ids(&self) -> &[ProductId] {
        &self.product_ids
    }

    pub fn order_date(&self) -> DateTime<Utc> {
        self.order_date
    }

    pub fn total_amount_cents(&self) -> i64 {
        self.total_amount_cents
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> OrderId {
        self.id
    }
}

/// Order creation request, as it arrives at the workflow: ids only, nothing
/// resolved yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer_id: CustomerId,
    pub product_ids: Vec<ProductId>,
    pub order_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use relaycrm_customers::NewCustomer;
    use relaycrm_products::NewProduct;

    fn customer() -> Customer {
        Customer::new(
            CustomerId::new(),
            NewCustomer::new("John Doe", "john@example.com"),
        )
    }

    fn product(price_cents: i64) -> Product {
        Product::new(ProductId::new(), NewProduct::new("Gadget", price_cents))
    }

    #[test]
    fn totals_the_resolved_product_prices() {
        let products = vec![product(49_999), product(29_999)];
        let order = Order::place(OrderId::new(), &customer(), &products, None, Utc::now()).unwrap();

        assert_eq!(order.total_amount_cents(), 79_998);
        assert_eq!(order.product_ids().len(), 2);
    }

    #[test]
    fn rejects_an_empty_product_set() {
        let err = Order::place(OrderId::new(), &customer(), &[], None, Utc::now()).unwrap_err();
        assert_eq!(err, DomainError::InvalidProducts);
    }

    #[test]
    fn order_date_defaults_to_now() {
        let now = Utc::now();
        let order = Order::place(OrderId::new(), &customer(), &[product(100)], None, now).unwrap();
        assert_eq!(order.order_date(), now);
    }

    #[test]
    fn explicit_order_date_wins() {
        let now = Utc::now();
        let requested = now - chrono::Duration::days(3);
        let order =
            Order::place(OrderId::new(), &customer(), &[product(100)], Some(requested), now)
                .unwrap();
        assert_eq!(order.order_date(), requested);
    }

    #[test]
    fn associations_point_at_the_resolved_products() {
        let products = vec![product(100), product(200), product(300)];
        let expected: Vec<ProductId> = products.iter().map(Entity::id).collect();

        let order = Order::place(OrderId::new(), &customer(), &products, None, Utc::now()).unwrap();
        assert_eq!(order.product_ids(), expected.as_slice());
    }

    proptest! {
        #[test]
        fn total_equals_sum_for_any_product_set(
            prices in proptest::collection::vec(1i64..10_000_000, 1..8)
        ) {
            let products: Vec<Product> = prices.iter().map(|p| product(*p)).collect();
            let order =
                Order::place(OrderId::new(), &customer(), &products, None, Utc::now()).unwrap();

            prop_assert_eq!(order.total_amount_cents(), prices.iter().sum::<i64>());
        }
    }
}
