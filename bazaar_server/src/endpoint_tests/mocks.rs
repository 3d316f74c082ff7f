use bazaar_engine::{
    bazaar_api::{
        catalog_objects::{ImportSummary, ListingDetails, ProductDetails, ShopQueryFilter},
        order_objects::{OrderDetails, PlacedOrder},
        price_list::PriceList,
    },
    db_types::{Category, Contact, NewContact, NewOrderItem, Order, OrderStatusType, Parameter, Shop},
    traits::{
        CatalogApiError,
        CatalogManagement,
        ContactApiError,
        ContactManagement,
        OrderFlowError,
        OrderManagement,
    },
};
use mockall::mock;

mock! {
    pub Backend {}
    impl CatalogManagement for Backend {
        async fn fetch_categories(&self, name: Option<String>) -> Result<Vec<Category>, CatalogApiError>;
        async fn fetch_shops(&self, filter: ShopQueryFilter) -> Result<Vec<Shop>, CatalogApiError>;
        async fn search_products(&self, search: Option<String>) -> Result<Vec<ProductDetails>, CatalogApiError>;
        async fn search_listings(&self, search: Option<String>) -> Result<Vec<ListingDetails>, CatalogApiError>;
        async fn fetch_parameters(&self) -> Result<Vec<Parameter>, CatalogApiError>;
        async fn import_price_list(&self, seller_id: i64, price_list: PriceList) -> Result<ImportSummary, CatalogApiError>;
    }
    impl OrderManagement for Backend {
        async fn fetch_basket(&self, user_id: i64) -> Result<Option<OrderDetails>, OrderFlowError>;
        async fn listing_exists(&self, listing_id: i64) -> Result<bool, OrderFlowError>;
        async fn add_basket_items(&self, user_id: i64, items: &[NewOrderItem]) -> Result<u64, OrderFlowError>;
        async fn update_basket_items(&self, user_id: i64, items: &[NewOrderItem]) -> Result<u64, OrderFlowError>;
        async fn remove_basket_items(&self, user_id: i64, listing_ids: &[i64]) -> Result<u64, OrderFlowError>;
        async fn promote_basket(&self, user_id: i64, order_id: i64) -> Result<Option<PlacedOrder>, OrderFlowError>;
        async fn fetch_orders_for_buyer(&self, user_id: i64) -> Result<Vec<OrderDetails>, OrderFlowError>;
        async fn fetch_orders_for_seller(&self, seller_id: i64) -> Result<Vec<OrderDetails>, OrderFlowError>;
        async fn update_order_status(&self, seller_id: i64, order_id: i64, status: &OrderStatusType) -> Result<Order, OrderFlowError>;
    }
    impl ContactManagement for Backend {
        async fn fetch_contacts(&self, user_id: i64) -> Result<Vec<Contact>, ContactApiError>;
        async fn fetch_contact(&self, user_id: i64, contact_id: i64) -> Result<Option<Contact>, ContactApiError>;
        async fn has_contacts(&self, user_id: i64) -> Result<bool, ContactApiError>;
        async fn insert_contact(&self, user_id: i64, contact: NewContact) -> Result<Contact, ContactApiError>;
        async fn save_contact(&self, contact: Contact) -> Result<Option<Contact>, ContactApiError>;
        async fn delete_contacts(&self, user_id: i64, ids: &[i64]) -> Result<u64, ContactApiError>;
    }
}
