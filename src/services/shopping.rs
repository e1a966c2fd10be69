//! Shopping workflow: cart assembly, coupon application, checkout and
//! order management.
//!
//! Checkout is a sequence of independent persistence calls (read cart,
//! insert order, decrement stock) with no cross-document transaction; a
//! failure between steps leaves the earlier writes in place.

use mongodb::bson::{doc, to_bson, DateTime};
use serde_json::Value;
use uuid::Uuid;

use super::{parse_id, to_json};
use crate::error::{ApiError, ApiResult};
use crate::models::cart::{CartItemPayload, CheckoutPayload};
use crate::models::order::OrderStatusPayload;
use crate::models::{Cart, CartLine, Coupon, Order, OrderStatus, PaymentIntent, Product, User};
use crate::store::{DynRepository, FindSpec, StoreError};

#[derive(Clone)]
pub struct ShoppingService {
    carts: DynRepository<Cart>,
    orders: DynRepository<Order>,
    products: DynRepository<Product>,
    coupons: DynRepository<Coupon>,
    users: DynRepository<User>,
}

/// Two-decimal money rounding used for totals and discounts.
pub fn round2(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

impl ShoppingService {
    pub fn new(
        carts: DynRepository<Cart>,
        orders: DynRepository<Order>,
        products: DynRepository<Product>,
        coupons: DynRepository<Coupon>,
        users: DynRepository<User>,
    ) -> Self {
        Self { carts, orders, products, coupons, users }
    }

    /// Builds the user's cart from live catalog prices and replaces any
    /// previous cart wholesale.
    pub async fn set_cart(&self, user: &User, items: Vec<CartItemPayload>) -> ApiResult<Cart> {
        let user_id = user.id.ok_or(ApiError::NotFound("user"))?;

        let mut lines = Vec::with_capacity(items.len());
        let mut total = 0.0;
        for item in items {
            let product_id = parse_id(&item.prod_id)?;
            let product = self
                .products
                .find_by_id(product_id)
                .await?
                .ok_or(ApiError::NotFound("product"))?;
            total += product.price * item.count as f64;
            lines.push(CartLine {
                product: product_id,
                count: item.count,
                color: item.color,
                price: product.price,
            });
        }

        // last write wins: any existing cart for this user goes away first
        self.carts.delete_many(doc! { "order_by": user_id }).await?;

        let now = DateTime::now();
        let cart = Cart {
            id: None,
            products: lines,
            cart_total: round2(total),
            total_after_discount: None,
            order_by: user_id,
            created_at: now,
            updated_at: now,
        };
        Ok(self.carts.insert(cart).await?)
    }

    /// The user's cart with line products resolved from the catalog.
    pub async fn get_cart(&self, user: &User) -> ApiResult<Value> {
        let user_id = user.id.ok_or(ApiError::NotFound("user"))?;
        let cart = self
            .carts
            .find_one(doc! { "order_by": user_id })
            .await?
            .ok_or(ApiError::NotFound("cart"))?;
        self.populate_lines(to_json(&cart)?, &cart.products).await
    }

    pub async fn empty_cart(&self, user: &User) -> ApiResult<Cart> {
        let user_id = user.id.ok_or(ApiError::NotFound("user"))?;
        let cart = self
            .carts
            .find_one(doc! { "order_by": user_id })
            .await?
            .ok_or(ApiError::NotFound("cart"))?;
        let id = cart.id.ok_or(ApiError::NotFound("cart"))?;
        self.carts.delete_by_id(id).await?;
        Ok(cart)
    }

    /// Applies a coupon to the active cart and returns the discounted total.
    pub async fn apply_coupon(&self, user: &User, code: &str) -> ApiResult<f64> {
        let coupon = self
            .coupons
            .find_one(doc! { "name": code.to_uppercase() })
            .await?
            .ok_or(ApiError::InvalidCoupon)?;
        let user_id = user.id.ok_or(ApiError::NotFound("user"))?;
        let cart = self
            .carts
            .find_one(doc! { "order_by": user_id })
            .await?
            .ok_or(ApiError::NotFound("cart"))?;
        let cart_id = cart.id.ok_or(ApiError::NotFound("cart"))?;

        // recompute from the line snapshots rather than trusting cart_total
        let total: f64 = cart.products.iter().map(|l| l.price * l.count as f64).sum();
        let discounted = round2(total * (1.0 - coupon.discount / 100.0));
        self.carts
            .update_by_id(
                cart_id,
                doc! { "$set": {
                    "total_after_discount": discounted,
                    "updated_at": DateTime::now(),
                } },
            )
            .await?;
        Ok(discounted)
    }

    /// Cash-on-delivery checkout: snapshots the cart into an order, then
    /// decrements stock / increments sold per purchased product.
    pub async fn checkout(&self, user: &User, payload: CheckoutPayload) -> ApiResult<Order> {
        if !payload.cod {
            return Err(ApiError::validation("create cash order failed: only COD is supported"));
        }
        let user_id = user.id.ok_or(ApiError::NotFound("user"))?;
        let cart = self
            .carts
            .find_one(doc! { "order_by": user_id })
            .await?
            .ok_or(ApiError::NotFound("cart"))?;

        let final_amount = match cart.total_after_discount {
            Some(discounted) if payload.coupon_applied => discounted,
            _ => cart.cart_total,
        };

        let now = DateTime::now();
        let order = Order {
            id: None,
            products: cart.products.clone(),
            payment_intent: PaymentIntent {
                id: Uuid::new_v4().to_string(),
                method: "COD".to_string(),
                amount: final_amount,
                status: OrderStatus::CashOnDelivery,
                currency: "usd".to_string(),
                created: now,
            },
            order_by: user_id,
            order_status: OrderStatus::CashOnDelivery,
            created_at: now,
            updated_at: now,
        };
        let order = self.orders.insert(order).await?;

        let ops = cart
            .products
            .iter()
            .map(|line| {
                (
                    doc! { "_id": line.product },
                    doc! { "$inc": { "quantity": -line.count, "sold": line.count } },
                )
            })
            .collect();
        self.orders_stock_update(ops).await?;

        Ok(order)
    }

    async fn orders_stock_update(
        &self,
        ops: Vec<(mongodb::bson::Document, mongodb::bson::Document)>,
    ) -> ApiResult<()> {
        self.products.batch_update(ops).await?;
        Ok(())
    }

    /// The caller's orders, products and owner resolved.
    pub async fn orders_for(&self, user: &User) -> ApiResult<Vec<Value>> {
        let user_id = user.id.ok_or(ApiError::NotFound("user"))?;
        let orders = self
            .orders
            .find(FindSpec {
                filter: doc! { "order_by": user_id },
                sort: doc! { "created_at": -1 },
                ..FindSpec::default()
            })
            .await?;
        self.populate_orders(orders).await
    }

    /// Every order in the system, admin view.
    pub async fn all_orders(&self) -> ApiResult<Vec<Value>> {
        let orders = self
            .orders
            .find(FindSpec { sort: doc! { "created_at": -1 }, ..FindSpec::default() })
            .await?;
        self.populate_orders(orders).await
    }

    /// Sets the order status and mirrors it onto the payment intent.
    pub async fn update_order_status(&self, id: &str, payload: OrderStatusPayload) -> ApiResult<Order> {
        let id = parse_id(id)?;
        let order = self.orders.find_by_id(id).await?.ok_or(ApiError::NotFound("order"))?;
        let mut intent = order.payment_intent;
        intent.status = payload.status;
        self.orders
            .update_by_id(
                id,
                doc! { "$set": {
                    "order_status": to_bson(&payload.status).map_err(StoreError::from)?,
                    "payment_intent": to_bson(&intent).map_err(StoreError::from)?,
                    "updated_at": DateTime::now(),
                } },
            )
            .await?
            .ok_or(ApiError::NotFound("order"))
    }

    async fn populate_orders(&self, orders: Vec<Order>) -> ApiResult<Vec<Value>> {
        let mut out = Vec::with_capacity(orders.len());
        for order in &orders {
            let mut value = self.populate_lines(to_json(order)?, &order.products).await?;
            if let Some(owner) = self.users.find_by_id(order.order_by).await? {
                let mut owner = to_json(&owner)?;
                crate::models::user::strip_secrets(&mut owner);
                value["order_by"] = owner;
            }
            out.push(value);
        }
        Ok(out)
    }

    /// Replaces each line's product reference with the product document.
    async fn populate_lines(&self, mut value: Value, lines: &[CartLine]) -> ApiResult<Value> {
        for (index, line) in lines.iter().enumerate() {
            if let Some(product) = self.products.find_by_id(line.product).await? {
                value["products"][index]["product"] = to_json(&product)?;
            }
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_half_up() {
        assert_eq!(round2(17.995), 18.0);
        assert_eq!(round2(18.0), 18.0);
        assert_eq!(round2(19.999), 20.0);
        assert_eq!(round2(0.004), 0.0);
    }
}
