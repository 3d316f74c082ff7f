use log::{debug, trace};
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    bazaar_api::order_objects::{OrderDetails, OrderedItem},
    db_types::{NewOrderItem, Order, OrderItem, OrderStatusType},
};

/// Which orders [`fetch_orders`] should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderScope {
    /// The user's open basket
    Basket(i64),
    /// Orders the user has placed
    PlacedBy(i64),
    /// Placed orders containing at least one item from the seller's shops
    SoldBy(i64),
}

pub async fn fetch_basket(user_id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE user_id = $1 AND status = 'basket'")
        .bind(user_id)
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

/// Returns the user's basket, creating an empty one if they do not have one. Call this first inside the transaction
/// that mutates the basket: the insert takes the write lock before anything is read, so concurrent writers queue on the
/// busy timeout instead of failing. The partial unique index on `orders` turns a second basket into a no-op.
pub async fn fetch_or_create_basket(user_id: i64, conn: &mut SqliteConnection) -> Result<Order, sqlx::Error> {
    let result = sqlx::query("INSERT INTO orders (user_id, status) VALUES ($1, 'basket') ON CONFLICT DO NOTHING")
        .bind(user_id)
        .execute(&mut *conn)
        .await?;
    let basket = fetch_basket(user_id, conn).await?.ok_or(sqlx::Error::RowNotFound)?;
    if result.rows_affected() > 0 {
        debug!("🗃️ Basket #{} created for user #{user_id}", basket.id);
    }
    Ok(basket)
}

pub async fn fetch_order(order_id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(order_id).fetch_optional(conn).await?;
    Ok(order)
}

pub async fn insert_item(
    order_id: i64,
    item: &NewOrderItem,
    conn: &mut SqliteConnection,
) -> Result<OrderItem, sqlx::Error> {
    let item = sqlx::query_as("INSERT INTO order_items (order_id, listing_id, quantity) VALUES ($1, $2, $3) RETURNING *")
        .bind(order_id)
        .bind(item.listing_id)
        .bind(item.quantity)
        .fetch_one(conn)
        .await?;
    Ok(item)
}

/// Sets the quantity on every item of the order that refers to the listing. Returns the number of rows changed.
pub async fn update_item_quantity(
    order_id: i64,
    item: &NewOrderItem,
    conn: &mut SqliteConnection,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE order_items SET quantity = $1 WHERE order_id = $2 AND listing_id = $3")
        .bind(item.quantity)
        .bind(order_id)
        .bind(item.listing_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

/// Deletes the items of the order that refer to any of the listings. Returns the number of rows deleted.
pub async fn delete_items_for_listings(
    order_id: i64,
    listing_ids: &[i64],
    conn: &mut SqliteConnection,
) -> Result<u64, sqlx::Error> {
    if listing_ids.is_empty() {
        return Ok(0);
    }
    let mut builder = QueryBuilder::new("DELETE FROM order_items WHERE order_id = ");
    builder.push_bind(order_id).push(" AND listing_id IN (");
    let mut ids = builder.separated(", ");
    for id in listing_ids {
        ids.push_bind(*id);
    }
    ids.push_unseparated(")");
    let result = builder.build().execute(conn).await?;
    Ok(result.rows_affected())
}

/// Moves the order from `basket` to `new`, but only if it is `user_id`'s basket and holds at least one item.
pub async fn promote_basket(
    user_id: i64,
    order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as(
        r#"
            UPDATE orders SET status = 'new'
            WHERE id = $1 AND user_id = $2 AND status = 'basket'
                AND EXISTS (SELECT 1 FROM order_items WHERE order_id = $1)
            RETURNING *;
        "#,
    )
    .bind(order_id)
    .bind(user_id)
    .fetch_optional(conn)
    .await?;
    Ok(order)
}

/// The owner of the shop that sells the order's first item. `None` if the order is empty or that shop has no owner.
pub async fn first_item_seller(order_id: i64, conn: &mut SqliteConnection) -> Result<Option<i64>, sqlx::Error> {
    let seller: Option<Option<i64>> = sqlx::query_scalar(
        r#"
            SELECT s.seller_id
            FROM order_items oi
                JOIN listings l ON l.id = oi.listing_id
                JOIN shops s ON s.id = l.shop_id
            WHERE oi.order_id = $1
            ORDER BY oi.id
            LIMIT 1
        "#,
    )
    .bind(order_id)
    .fetch_optional(conn)
    .await?;
    Ok(seller.flatten())
}

/// Sets the status of a placed order that contains at least one item from `seller_id`'s shops. `None` means no such
/// order exists.
pub async fn update_status(
    seller_id: i64,
    order_id: i64,
    status: &OrderStatusType,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as(
        r#"
            UPDATE orders SET status = $1
            WHERE id = $2 AND status != 'basket' AND EXISTS (
                SELECT 1
                FROM order_items oi
                    JOIN listings l ON l.id = oi.listing_id
                    JOIN shops s ON s.id = l.shop_id
                WHERE oi.order_id = $2 AND s.seller_id = $3
            )
            RETURNING *;
        "#,
    )
    .bind(status.as_str())
    .bind(order_id)
    .bind(seller_id)
    .fetch_optional(conn)
    .await?;
    Ok(order)
}

/// Fetches the orders in `scope`, newest first.
pub async fn fetch_orders(scope: OrderScope, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let mut builder = QueryBuilder::new("SELECT o.id, o.user_id, o.created_at, o.status FROM orders o WHERE ");
    match scope {
        OrderScope::Basket(user_id) => {
            builder.push("o.status = 'basket' AND o.user_id = ").push_bind(user_id);
        },
        OrderScope::PlacedBy(user_id) => {
            builder.push("o.status != 'basket' AND o.user_id = ").push_bind(user_id);
        },
        OrderScope::SoldBy(seller_id) => {
            builder
                .push(
                    r#"o.status != 'basket' AND o.id IN (
                        SELECT si.order_id
                        FROM order_items si
                            JOIN listings sl ON sl.id = si.listing_id
                            JOIN shops ss ON ss.id = sl.shop_id
                        WHERE ss.seller_id = "#,
                )
                .push_bind(seller_id)
                .push(")");
        },
    }
    builder.push(" ORDER BY o.created_at DESC, o.id DESC");
    trace!("🗃️ Executing query: {}", builder.sql());
    let orders = builder.build_query_as::<Order>().fetch_all(conn).await?;
    Ok(orders)
}

pub async fn fetch_ordered_items(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<OrderedItem>, sqlx::Error> {
    let items = sqlx::query_as(
        r#"
        SELECT oi.id, oi.order_id, oi.quantity,
               l.id AS listing_id, l.ext_id, l.price, l.price_rrc,
               s.id AS shop_id, s.name AS shop_name,
               p.id AS product_id, p.name AS product_name, p.model AS product_model
        FROM order_items oi
            JOIN listings l ON l.id = oi.listing_id
            JOIN shops s ON s.id = l.shop_id
            JOIN products p ON p.id = l.product_id
        WHERE oi.order_id = $1
        ORDER BY oi.id
        "#,
    )
    .bind(order_id)
    .fetch_all(conn)
    .await?;
    Ok(items)
}

/// [`fetch_orders`] plus the items of each order. Totals are summed from the items on every read.
pub async fn fetch_order_details(
    scope: OrderScope,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderDetails>, sqlx::Error> {
    let orders = fetch_orders(scope, &mut *conn).await?;
    let mut result = Vec::with_capacity(orders.len());
    for order in orders {
        let items = fetch_ordered_items(order.id, &mut *conn).await?;
        result.push(OrderDetails::new(order, items));
    }
    Ok(result)
}
