use std::collections::HashMap;

use log::{debug, trace};
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    bazaar_api::{
        catalog_objects::{AttributeValue, ListingDetails, ProductDetails, ShopQueryFilter},
        price_list::PriceListGood,
    },
    db_types::{Category, Listing, Parameter, Product, ProductAttribute, Shop},
};

//--------------------------------------      Shops         -----------------------------------------------------------

/// Creates the shop if there is none with this name, and hands it to `seller_id` either way. A `url` of `None` keeps
/// whatever url the shop already had.
pub async fn upsert_shop(
    name: &str,
    url: Option<&str>,
    seller_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Shop, sqlx::Error> {
    let shop = sqlx::query_as(
        r#"
            INSERT INTO shops (name, url, seller_id) VALUES ($1, $2, $3)
            ON CONFLICT (name) DO UPDATE SET seller_id = excluded.seller_id, url = COALESCE(excluded.url, shops.url)
            RETURNING *;
        "#,
    )
    .bind(name)
    .bind(url)
    .bind(seller_id)
    .fetch_one(conn)
    .await?;
    Ok(shop)
}

pub async fn fetch_shops(filter: ShopQueryFilter, conn: &mut SqliteConnection) -> Result<Vec<Shop>, sqlx::Error> {
    let mut builder = QueryBuilder::new("SELECT * FROM shops ");
    if !filter.is_empty() {
        builder.push("WHERE ");
    }
    let mut where_clause = builder.separated(" AND ");
    if let Some(name) = filter.name {
        where_clause.push("name = ");
        where_clause.push_bind_unseparated(name);
    }
    if let Some(is_work) = filter.is_work {
        where_clause.push("is_work = ");
        where_clause.push_bind_unseparated(is_work);
    }
    builder.push(" ORDER BY name");
    trace!("🗃️ Executing query: {}", builder.sql());
    let shops = builder.build_query_as::<Shop>().fetch_all(conn).await?;
    Ok(shops)
}

//--------------------------------------    Categories      -----------------------------------------------------------

/// Inserts the category, or renames the existing category with the same id.
pub async fn upsert_category(id: i64, name: &str, conn: &mut SqliteConnection) -> Result<Category, sqlx::Error> {
    let category = sqlx::query_as(
        r#"
            INSERT INTO categories (id, name) VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET name = excluded.name
            RETURNING *;
        "#,
    )
    .bind(id)
    .bind(name)
    .fetch_one(conn)
    .await?;
    Ok(category)
}

pub async fn link_shop_category(shop_id: i64, category_id: i64, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT OR IGNORE INTO shop_categories (shop_id, category_id) VALUES ($1, $2)")
        .bind(shop_id)
        .bind(category_id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn category_exists(id: i64, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let found: Option<i64> =
        sqlx::query_scalar("SELECT id FROM categories WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(found.is_some())
}

pub async fn fetch_categories(name: Option<String>, conn: &mut SqliteConnection) -> Result<Vec<Category>, sqlx::Error> {
    let mut builder = QueryBuilder::new("SELECT * FROM categories");
    if let Some(name) = name {
        builder.push(" WHERE name = ").push_bind(name);
    }
    builder.push(" ORDER BY id");
    let categories = builder.build_query_as::<Category>().fetch_all(conn).await?;
    Ok(categories)
}

//--------------------------------------     Products       -----------------------------------------------------------

/// Returns the product matching all of `(name, model, category_id)`, creating it if there is none. The flag is true
/// when the product was created.
pub async fn fetch_or_create_product(
    name: &str,
    model: &str,
    category_id: i64,
    conn: &mut SqliteConnection,
) -> Result<(Product, bool), sqlx::Error> {
    let existing: Option<Product> =
        sqlx::query_as("SELECT * FROM products WHERE name = $1 AND model = $2 AND category_id = $3 LIMIT 1")
            .bind(name)
            .bind(model)
            .bind(category_id)
            .fetch_optional(&mut *conn)
            .await?;
    if let Some(product) = existing {
        return Ok((product, false));
    }
    let product: Product =
        sqlx::query_as("INSERT INTO products (name, model, category_id) VALUES ($1, $2, $3) RETURNING *")
            .bind(name)
            .bind(model)
            .bind(category_id)
            .fetch_one(conn)
            .await?;
    debug!("🗃️ Product #{} '{}' created", product.id, product.name);
    Ok((product, true))
}

/// Products whose name or model contains `search`, with their category name and attributes.
pub async fn search_products(
    search: Option<String>,
    conn: &mut SqliteConnection,
) -> Result<Vec<ProductDetails>, sqlx::Error> {
    let mut builder = QueryBuilder::new(
        r#"
        SELECT p.id, p.name, p.model, p.category_id, c.name AS category_name
        FROM products p JOIN categories c ON c.id = p.category_id
        "#,
    );
    if let Some(term) = search {
        let pattern = format!("%{term}%");
        builder.push(" WHERE p.name LIKE ").push_bind(pattern.clone()).push(" OR p.model LIKE ").push_bind(pattern);
    }
    builder.push(" ORDER BY p.id");
    let mut products = builder.build_query_as::<ProductDetails>().fetch_all(&mut *conn).await?;
    if products.is_empty() {
        return Ok(products);
    }
    let ids = products.iter().map(|p| p.id).collect::<Vec<_>>();
    let mut attributes = attributes_for_products(&ids, conn).await?;
    for product in &mut products {
        product.attributes = attributes.remove(&product.id).unwrap_or_default();
    }
    Ok(products)
}

async fn attributes_for_products(
    product_ids: &[i64],
    conn: &mut SqliteConnection,
) -> Result<HashMap<i64, Vec<AttributeValue>>, sqlx::Error> {
    let mut builder = QueryBuilder::new(
        r#"
        SELECT a.product_id, p.name AS parameter, a.value
        FROM product_attributes a JOIN parameters p ON p.id = a.parameter_id
        WHERE a.product_id IN ("#,
    );
    let mut ids = builder.separated(", ");
    for id in product_ids {
        ids.push_bind(*id);
    }
    ids.push_unseparated(") ORDER BY a.product_id, p.name");
    let rows = builder.build_query_as::<AttributeValue>().fetch_all(conn).await?;
    let mut result = HashMap::<i64, Vec<AttributeValue>>::new();
    for row in rows {
        result.entry(row.product_id).or_default().push(row);
    }
    Ok(result)
}

//--------------------------------------     Listings       -----------------------------------------------------------

/// Looks for a listing with exactly these values, and creates one if there is none. Any difference in stock or price
/// therefore yields a new listing. The flag is true when the listing was created.
pub async fn fetch_or_create_listing(
    shop_id: i64,
    product_id: i64,
    good: &PriceListGood,
    conn: &mut SqliteConnection,
) -> Result<(Listing, bool), sqlx::Error> {
    let existing: Option<Listing> = sqlx::query_as(
        r#"
            SELECT * FROM listings
            WHERE ext_id = $1 AND quantity = $2 AND price = $3 AND price_rrc = $4 AND product_id = $5 AND shop_id = $6
            LIMIT 1
        "#,
    )
    .bind(good.id)
    .bind(good.quantity)
    .bind(good.price.value())
    .bind(good.price_rrc.value())
    .bind(product_id)
    .bind(shop_id)
    .fetch_optional(&mut *conn)
    .await?;
    if let Some(listing) = existing {
        return Ok((listing, false));
    }
    let listing: Listing = sqlx::query_as(
        r#"
            INSERT INTO listings (shop_id, product_id, ext_id, quantity, price, price_rrc)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *;
        "#,
    )
    .bind(shop_id)
    .bind(product_id)
    .bind(good.id)
    .bind(good.quantity)
    .bind(good.price.value())
    .bind(good.price_rrc.value())
    .fetch_one(conn)
    .await?;
    trace!("🗃️ Listing #{} created for product #{product_id} in shop #{shop_id}", listing.id);
    Ok((listing, true))
}

pub async fn listing_exists(id: i64, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let found: Option<i64> =
        sqlx::query_scalar("SELECT id FROM listings WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(found.is_some())
}

/// Listings whose product name or model contains `search`.
pub async fn search_listings(
    search: Option<String>,
    conn: &mut SqliteConnection,
) -> Result<Vec<ListingDetails>, sqlx::Error> {
    let mut builder = QueryBuilder::new(
        r#"
        SELECT l.id, l.ext_id, l.quantity, l.price, l.price_rrc,
               s.id AS shop_id, s.name AS shop_name,
               p.id AS product_id, p.name AS product_name, p.model AS product_model, p.category_id
        FROM listings l
            JOIN shops s ON s.id = l.shop_id
            JOIN products p ON p.id = l.product_id
        "#,
    );
    if let Some(term) = search {
        let pattern = format!("%{term}%");
        builder.push(" WHERE p.name LIKE ").push_bind(pattern.clone()).push(" OR p.model LIKE ").push_bind(pattern);
    }
    builder.push(" ORDER BY l.id");
    let listings = builder.build_query_as::<ListingDetails>().fetch_all(conn).await?;
    Ok(listings)
}

//--------------------------------------    Parameters      -----------------------------------------------------------

pub async fn fetch_or_create_parameter(name: &str, conn: &mut SqliteConnection) -> Result<Parameter, sqlx::Error> {
    // The no-op update makes RETURNING yield the existing row on conflict
    let parameter = sqlx::query_as(
        r#"
            INSERT INTO parameters (name) VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = excluded.name
            RETURNING *;
        "#,
    )
    .bind(name)
    .fetch_one(conn)
    .await?;
    Ok(parameter)
}

pub async fn fetch_parameters(conn: &mut SqliteConnection) -> Result<Vec<Parameter>, sqlx::Error> {
    let parameters = sqlx::query_as("SELECT * FROM parameters ORDER BY name").fetch_all(conn).await?;
    Ok(parameters)
}

/// Returns the attribute matching all of `(value, parameter, product)`, creating it if needed.
pub async fn fetch_or_create_attribute(
    product_id: i64,
    parameter_id: i64,
    value: &str,
    conn: &mut SqliteConnection,
) -> Result<(ProductAttribute, bool), sqlx::Error> {
    let existing: Option<ProductAttribute> = sqlx::query_as(
        "SELECT * FROM product_attributes WHERE value = $1 AND parameter_id = $2 AND product_id = $3 LIMIT 1",
    )
    .bind(value)
    .bind(parameter_id)
    .bind(product_id)
    .fetch_optional(&mut *conn)
    .await?;
    if let Some(attribute) = existing {
        return Ok((attribute, false));
    }
    let attribute = sqlx::query_as(
        "INSERT INTO product_attributes (product_id, parameter_id, value) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(product_id)
    .bind(parameter_id)
    .bind(value)
    .fetch_one(conn)
    .await?;
    Ok((attribute, true))
}
