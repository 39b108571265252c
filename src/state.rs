use std::sync::Arc;

use crate::application::cart_service::CartService;
use crate::application::catalog_service::CatalogService;
use crate::application::order_service::OrderService;
use crate::application::review_service::ReviewService;
use crate::application::user_service::UserService;
use crate::db::DbPool;
use crate::infrastructure::catalog_repo::DieselCatalog;
use crate::infrastructure::memory::MemoryStore;
use crate::infrastructure::order_repo::DieselOrderRepository;
use crate::infrastructure::review_repo::DieselReviewRepository;
use crate::infrastructure::session_store::DieselSessionStore;
use crate::infrastructure::user_repo::DieselUserRepository;

/// Services shared by every worker. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub cart: Arc<CartService>,
    pub orders: Arc<OrderService>,
    pub reviews: Arc<ReviewService>,
    pub users: Arc<UserService>,
}

impl AppState {
    pub fn from_pool(pool: DbPool, session_ttl: chrono::Duration) -> Self {
        let catalog = Arc::new(DieselCatalog::new(pool.clone()));
        let sessions = Arc::new(DieselSessionStore::new(pool.clone(), session_ttl));

        Self {
            catalog: Arc::new(CatalogService::new(catalog.clone())),
            cart: Arc::new(CartService::new(catalog.clone(), sessions.clone())),
            orders: Arc::new(OrderService::new(
                Arc::new(DieselOrderRepository::new(pool.clone())),
                sessions,
            )),
            reviews: Arc::new(ReviewService::new(
                Arc::new(DieselReviewRepository::new(pool.clone())),
                catalog,
            )),
            users: Arc::new(UserService::new(Arc::new(DieselUserRepository::new(pool)))),
        }
    }

    /// Every port backed by the same in-process store.
    pub fn in_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            catalog: Arc::new(CatalogService::new(store.clone())),
            cart: Arc::new(CartService::new(store.clone(), store.clone())),
            orders: Arc::new(OrderService::new(store.clone(), store.clone())),
            reviews: Arc::new(ReviewService::new(store.clone(), store.clone())),
            users: Arc::new(UserService::new(store)),
        }
    }
}
