//! Shopping module — lists, items, catalog, statistics, and the
//! client-side sync layer.

pub mod api;
pub mod client;
pub mod events;
pub mod model;
pub mod schema;
pub mod service;
pub mod validate;

use std::sync::Arc;

use axum::Router;
use grocer_core::Module;

use service::ShoppingService;

/// The shopping module — mounts the REST API for lists, items,
/// categories, units and statistics.
pub struct ShoppingModule {
    service: Arc<ShoppingService>,
}

impl ShoppingModule {
    pub fn new(service: Arc<ShoppingService>) -> Self {
        Self { service }
    }

    /// The underlying service, for bootstrap tasks.
    pub fn service(&self) -> &Arc<ShoppingService> {
        &self.service
    }
}

impl Module for ShoppingModule {
    fn name(&self) -> &str {
        "api"
    }

    fn routes(&self) -> Router {
        api::router(Arc::clone(&self.service))
    }
}
