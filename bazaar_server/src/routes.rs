//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a few lines MUST delegate to the engine APIs. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Any long, non-cpu-bound operation (I/O, database calls, etc.) must
//! be expressed as futures so that async handlers get executed concurrently.
use actix_web::{get, web, HttpResponse, Responder};
use bazaar_common::helpers::parse_flag;
use bazaar_engine::{
    bazaar_api::{catalog_objects::ShopQueryFilter, order_objects::BasketItemRequest},
    db_types::{ContactUpdate, UserType},
    traits::{CatalogManagement, ContactManagement, OrderManagement},
    BasketApi,
    CatalogApi,
    ContactsApi,
    SellerOrdersApi,
};
use log::*;
use serde_json::json;

use crate::{
    auth::JwtClaims,
    data_objects::{
        ContactUpdateParams,
        ItemsParam,
        JsonResponse,
        NameQuery,
        PlaceOrderParams,
        SearchQuery,
        ShopQuery,
        StatusUpdateParams,
    },
    errors::ServerError,
    import_worker::PriceListUploads,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro.
//
// * `route!(name => Get "/path" requires [UserType::Seller])` registers the non-generic handler `name` behind the ACL.
// * `route!(name => Get "/path" impl TraitA, TraitB)` registers `name::<A>` for a backend `A` implementing every
//   listed trait.
// * `route!(name => Get "/path" impl TraitA where requires [UserType::Seller])` does both.
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal requires [$($roles:expr),+]) => {
        paste::paste! { pub struct [<$name:camel Route>]; }
        paste::paste! {
            impl [<$name:camel Route>] {
                #[allow(clippy::new_without_default)]
                pub fn new() -> Self { Self }
            }
        }
        paste::paste! {
            impl actix_web::dev::HttpServiceFactory for [<$name:camel Route>] {
                fn register(self, config: &mut actix_web::dev::AppService) {
                    let res = actix_web::Resource::new($path)
                        .name(stringify!($name))
                        .guard(actix_web::guard::$method())
                        .to($name)
                        .wrap($crate::middleware::AclMiddlewareFactory::new(&[$($roles),+]));
                    actix_web::dev::HttpServiceFactory::register(res, config);
                }
            }
        }
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:path),+ where requires [$($roles:expr),+]) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>); }
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds +)+ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>)
                    .wrap($crate::middleware::AclMiddlewareFactory::new(&[$($roles),+]));
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:path),+) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>); }
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds +)+ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Catalog  ----------------------------------------------------
route!(categories => Get "/categories" impl CatalogManagement);
pub async fn categories<A: CatalogManagement>(
    query: web::Query<NameQuery>,
    api: web::Data<CatalogApi<A>>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET categories");
    let categories = api.categories(query.into_inner().name).await?;
    Ok(HttpResponse::Ok().json(categories))
}

route!(shops => Get "/shops" impl CatalogManagement);
/// Lists shops. `is_work` takes the usual flag spellings (`1`, `true`, `yes`, `on` and their negatives); anything else
/// is ignored.
pub async fn shops<A: CatalogManagement>(
    query: web::Query<ShopQuery>,
    api: web::Data<CatalogApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let ShopQuery { name, is_work } = query.into_inner();
    let mut filter = ShopQueryFilter::default();
    if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
        filter = filter.with_name(name);
    }
    if let Some(flag) = is_work {
        match parse_flag(&flag) {
            Some(is_work) => filter = filter.with_is_work(is_work),
            None => debug!("💻️ Ignoring unrecognised is_work value '{flag}'"),
        }
    }
    trace!("💻️ GET shops with {filter:?}");
    let shops = api.shops(filter).await?;
    Ok(HttpResponse::Ok().json(shops))
}

route!(products => Get "/products" impl CatalogManagement);
pub async fn products<A: CatalogManagement>(
    query: web::Query<SearchQuery>,
    api: web::Data<CatalogApi<A>>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET products");
    let products = api.products(query.into_inner().search).await?;
    Ok(HttpResponse::Ok().json(products))
}

route!(listings => Get "/listings" impl CatalogManagement);
pub async fn listings<A: CatalogManagement>(
    query: web::Query<SearchQuery>,
    api: web::Data<CatalogApi<A>>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET listings");
    let listings = api.listings(query.into_inner().search).await?;
    Ok(HttpResponse::Ok().json(listings))
}

route!(parameters => Get "/parameters" impl CatalogManagement);
pub async fn parameters<A: CatalogManagement>(api: web::Data<CatalogApi<A>>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET parameters");
    let parameters = api.parameters().await?;
    Ok(HttpResponse::Ok().json(parameters))
}

//----------------------------------------------   Basket  ----------------------------------------------------
route!(basket => Get "/basket" impl OrderManagement, ContactManagement);
pub async fn basket<A>(claims: JwtClaims, api: web::Data<BasketApi<A>>) -> Result<HttpResponse, ServerError>
where A: OrderManagement + ContactManagement {
    debug!("💻️ GET basket for user #{}", claims.sub);
    let basket = api.basket(claims.sub).await?;
    Ok(HttpResponse::Ok().json(basket))
}

route!(add_to_basket => Post "/basket" impl OrderManagement, ContactManagement);
pub async fn add_to_basket<A>(
    claims: JwtClaims,
    body: web::Json<Vec<BasketItemRequest>>,
    api: web::Data<BasketApi<A>>,
) -> Result<HttpResponse, ServerError>
where
    A: OrderManagement + ContactManagement,
{
    debug!("💻️ POST {} items to the basket of user #{}", body.len(), claims.sub);
    let created = api.add_items(claims.sub, &body).await?;
    Ok(HttpResponse::Created().json(json!({ "success": true, "created": created })))
}

route!(update_basket => Put "/basket" impl OrderManagement, ContactManagement);
pub async fn update_basket<A>(
    claims: JwtClaims,
    body: web::Json<Vec<BasketItemRequest>>,
    api: web::Data<BasketApi<A>>,
) -> Result<HttpResponse, ServerError>
where
    A: OrderManagement + ContactManagement,
{
    debug!("💻️ PUT {} basket updates for user #{}", body.len(), claims.sub);
    let updated = api.update_quantities(claims.sub, &body).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "updated": updated })))
}

route!(remove_from_basket => Delete "/basket" impl OrderManagement, ContactManagement);
pub async fn remove_from_basket<A>(
    claims: JwtClaims,
    body: web::Json<ItemsParam>,
    api: web::Data<BasketApi<A>>,
) -> Result<HttpResponse, ServerError>
where
    A: OrderManagement + ContactManagement,
{
    debug!("💻️ DELETE basket items [{}] for user #{}", body.items, claims.sub);
    let deleted = api.remove_items(claims.sub, &body.items).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "deleted": deleted })))
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(my_orders => Get "/orders" impl OrderManagement, ContactManagement);
pub async fn my_orders<A>(claims: JwtClaims, api: web::Data<BasketApi<A>>) -> Result<HttpResponse, ServerError>
where A: OrderManagement + ContactManagement {
    debug!("💻️ GET orders for user #{}", claims.sub);
    let orders = api.my_orders(claims.sub).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(place_order => Post "/orders" impl OrderManagement, ContactManagement);
/// Places the basket given by `id`. An id that is not the caller's open basket changes nothing and is reported as a
/// bad argument.
pub async fn place_order<A>(
    claims: JwtClaims,
    body: web::Json<PlaceOrderParams>,
    api: web::Data<BasketApi<A>>,
) -> Result<HttpResponse, ServerError>
where
    A: OrderManagement + ContactManagement,
{
    let order_id = body.id.ok_or_else(|| ServerError::MissingArguments("id".into()))?;
    debug!("💻️ POST place order #{order_id} for user #{}", claims.sub);
    let placed = api
        .place_order(claims.sub, order_id)
        .await?
        .ok_or_else(|| ServerError::MissingArguments(format!("id (order #{order_id} is not your basket)")))?;
    Ok(HttpResponse::Created().json(json!({ "success": true, "order": placed.order })))
}

//----------------------------------------------   Seller  ----------------------------------------------------
route!(seller_orders => Get "/seller/orders" impl OrderManagement where requires [UserType::Seller]);
pub async fn seller_orders<A: OrderManagement>(
    claims: JwtClaims,
    api: web::Data<SellerOrdersApi<A>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET orders for seller #{}", claims.sub);
    let orders = api.orders(&claims.session_user()).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(update_order_status => Put "/seller/orders" impl OrderManagement where requires [UserType::Seller]);
pub async fn update_order_status<A: OrderManagement>(
    claims: JwtClaims,
    body: web::Json<StatusUpdateParams>,
    api: web::Data<SellerOrdersApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let StatusUpdateParams { id, status } = body.into_inner();
    let order_id = id.ok_or_else(|| ServerError::MissingArguments("id".into()))?;
    let status = status.unwrap_or_default();
    debug!("💻️ PUT status '{status}' on order #{order_id} by seller #{}", claims.sub);
    let order = api.update_status(&claims.session_user(), order_id, &status).await?;
    Ok(HttpResponse::Created().json(json!({ "success": true, "order": order })))
}

route!(upload_price_list => Post "/seller/price_list" requires [UserType::Seller]);
/// Accepts a YAML price list as the raw request body. The document is stored and queued; the import itself happens in
/// the background, so a 201 only means the upload was accepted.
pub async fn upload_price_list(
    claims: JwtClaims,
    body: web::Bytes,
    uploads: web::Data<PriceListUploads>,
) -> Result<HttpResponse, ServerError> {
    let text = std::str::from_utf8(&body)
        .map_err(|e| ServerError::InvalidRequestBody(format!("The price list is not valid UTF-8. {e}")))?;
    if text.trim().is_empty() {
        return Err(ServerError::InvalidRequestBody("The price list is empty".into()));
    }
    debug!("💻️ POST price list ({} bytes) from seller #{}", body.len(), claims.sub);
    uploads.store_and_queue(claims.sub, &body).await?;
    Ok(HttpResponse::Created().json(JsonResponse::success("Price list queued for import")))
}

//----------------------------------------------   Contacts  ----------------------------------------------------
route!(my_contacts => Get "/contacts" impl ContactManagement);
pub async fn my_contacts<A: ContactManagement>(
    claims: JwtClaims,
    api: web::Data<ContactsApi<A>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET contacts for user #{}", claims.sub);
    let contacts = api.contacts(claims.sub).await?;
    Ok(HttpResponse::Ok().json(contacts))
}

route!(add_contact => Post "/contacts" impl ContactManagement);
pub async fn add_contact<A: ContactManagement>(
    claims: JwtClaims,
    body: web::Json<ContactUpdate>,
    api: web::Data<ContactsApi<A>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ POST contact for user #{}", claims.sub);
    let contact = api.add_contact(claims.sub, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(contact))
}

route!(update_contact => Put "/contacts" impl ContactManagement);
pub async fn update_contact<A: ContactManagement>(
    claims: JwtClaims,
    body: web::Json<ContactUpdateParams>,
    api: web::Data<ContactsApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let ContactUpdateParams { id, fields } = body.into_inner();
    let contact_id = id.ok_or_else(|| ServerError::MissingArguments("id".into()))?;
    debug!("💻️ PUT contact #{contact_id} for user #{}", claims.sub);
    let contact = api.update_contact(claims.sub, contact_id, fields).await?;
    Ok(HttpResponse::Ok().json(contact))
}

route!(delete_contacts => Delete "/contacts" impl ContactManagement);
pub async fn delete_contacts<A: ContactManagement>(
    claims: JwtClaims,
    body: web::Json<ItemsParam>,
    api: web::Data<ContactsApi<A>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ DELETE contacts [{}] for user #{}", body.items, claims.sub);
    let deleted = api.delete_contacts(claims.sub, &body.items).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "deleted": deleted })))
}
