use std::{path::Path, time::Duration};

use actix_web::{
    dev::Server,
    error::{InternalError, JsonPayloadError},
    http::KeepAlive,
    middleware::Logger,
    web,
    App,
    HttpRequest,
    HttpServer,
    ResponseError,
};
use bazaar_engine::{
    events::{EventHandlers, EventProducers},
    BasketApi,
    CatalogApi,
    ContactsApi,
    SellerOrdersApi,
    SqliteDatabase,
};
use log::*;

use crate::{
    auth::TokenValidator,
    config::ServerConfig,
    errors::ServerError,
    import_worker::{import_worker, PriceListUploads},
    middleware::JwtMiddlewareFactory,
    notifications::notification_hooks,
    routes::{
        health,
        AddContactRoute,
        AddToBasketRoute,
        BasketRoute,
        CategoriesRoute,
        DeleteContactsRoute,
        ListingsRoute,
        MyContactsRoute,
        MyOrdersRoute,
        ParametersRoute,
        PlaceOrderRoute,
        ProductsRoute,
        RemoveFromBasketRoute,
        SellerOrdersRoute,
        ShopsRoute,
        UpdateBasketRoute,
        UpdateContactRoute,
        UpdateOrderStatusRoute,
        UploadPriceListRoute,
    },
};

const MAX_PRICE_LIST_SIZE: usize = 4 * 1024 * 1024;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    ensure_database_dir(&config.database_url).await?;
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(format!("Could not run migrations. {e}")))?;
    info!("🚀️ Database ready at {}", db.url());
    let handlers = EventHandlers::new(config.event_buffer_size, notification_hooks());
    let producers = handlers.producers();
    handlers.start_handlers();
    let importer = import_worker(db.clone(), config.event_buffer_size);
    let uploads = PriceListUploads::new(config.upload_dir.clone(), importer.subscribe());
    tokio::spawn(importer.start_handler());
    info!("🚀️ Price lists will be stored in {}", uploads.dir().display());
    let srv = create_server_instance(config, db, producers, uploads)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
    uploads: PriceListUploads,
) -> Result<Server, ServerError> {
    let validator = TokenValidator::new(&config.auth);
    info!("🚀️ Starting server on {}:{}", config.host, config.port);
    let srv = HttpServer::new(move || {
        let catalog_api = CatalogApi::new(db.clone());
        let basket_api = BasketApi::new(db.clone(), producers.clone());
        let seller_api = SellerOrdersApi::new(db.clone(), producers.clone());
        let contacts_api = ContactsApi::new(db.clone());
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("bzr::access_log"))
            .app_data(web::Data::new(catalog_api))
            .app_data(web::Data::new(basket_api))
            .app_data(web::Data::new(seller_api))
            .app_data(web::Data::new(contacts_api))
            .app_data(web::Data::new(uploads.clone()))
            .app_data(json_config())
            .app_data(web::PayloadConfig::new(MAX_PRICE_LIST_SIZE));
        // Routes that require authentication
        let auth_scope = web::scope("/api")
            .wrap(JwtMiddlewareFactory::new(validator.clone()))
            .service(BasketRoute::<SqliteDatabase>::new())
            .service(AddToBasketRoute::<SqliteDatabase>::new())
            .service(UpdateBasketRoute::<SqliteDatabase>::new())
            .service(RemoveFromBasketRoute::<SqliteDatabase>::new())
            .service(MyOrdersRoute::<SqliteDatabase>::new())
            .service(PlaceOrderRoute::<SqliteDatabase>::new())
            .service(SellerOrdersRoute::<SqliteDatabase>::new())
            .service(UpdateOrderStatusRoute::<SqliteDatabase>::new())
            .service(UploadPriceListRoute::new())
            .service(MyContactsRoute::<SqliteDatabase>::new())
            .service(AddContactRoute::<SqliteDatabase>::new())
            .service(UpdateContactRoute::<SqliteDatabase>::new())
            .service(DeleteContactsRoute::<SqliteDatabase>::new());
        app.service(health)
            .service(CategoriesRoute::<SqliteDatabase>::new())
            .service(ShopsRoute::<SqliteDatabase>::new())
            .service(ProductsRoute::<SqliteDatabase>::new())
            .service(ListingsRoute::<SqliteDatabase>::new())
            .service(ParametersRoute::<SqliteDatabase>::new())
            .service(auth_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Malformed JSON bodies are reported in the same shape as every other error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        debug!("💻️ Rejected request body. {err}");
        let err = ServerError::InvalidRequestBody(err.to_string());
        let response = err.error_response();
        InternalError::from_response(err, response).into()
    })
}

async fn ensure_database_dir(url: &str) -> Result<(), ServerError> {
    let path = url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
    if path.starts_with(':') {
        return Ok(());
    }
    let path = path.split('?').next().unwrap_or(path);
    if let Some(dir) = Path::new(path).parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir).await?;
    }
    Ok(())
}
