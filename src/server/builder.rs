//! ServerBuilder for fluent API to build HTTP servers

use super::entity_registry::{EntityDescriptor, EntityRegistry};
use super::exposure::RestExposure;
use super::host::ServerHost;
use crate::config::AppConfig;
use crate::core::auth::{AuthProvider, StaticTokenAuthProvider};
use crate::entities::{
    Billboard, CatalogDescriptor, Category, Color, OrderDescriptor, Product, Size,
    StoreDescriptor,
};
use crate::payment::{PaymentProvider, RecordingPaymentProvider, StripePaymentProvider};
use crate::storage::Catalog;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for creating the HTTP server
///
/// Anything not set explicitly is derived from the configuration: bearer
/// tokens from `auth.tokens`, Stripe when `payment.stripe_api_key` is set and
/// the recording provider otherwise, and an in-memory catalog.
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(AppConfig::load()?)
///     .with_default_descriptors()
///     .build()?;
/// ```
pub struct ServerBuilder {
    config: AppConfig,
    catalog: Option<Catalog>,
    auth: Option<Arc<dyn AuthProvider>>,
    payments: Option<Arc<dyn PaymentProvider>>,
    entity_registry: EntityRegistry,
    custom_routes: Vec<Router<Arc<ServerHost>>>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            catalog: None,
            auth: None,
            payments: None,
            entity_registry: EntityRegistry::new(),
            custom_routes: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_auth_provider(mut self, auth: impl AuthProvider + 'static) -> Self {
        self.auth = Some(Arc::new(auth));
        self
    }

    pub fn with_payment_provider(mut self, payments: Arc<dyn PaymentProvider>) -> Self {
        self.payments = Some(payments);
        self
    }

    pub fn register_descriptor(mut self, descriptor: impl EntityDescriptor + 'static) -> Self {
        self.entity_registry.register(Box::new(descriptor));
        self
    }

    /// Stores, orders and the five catalog resources
    pub fn with_default_descriptors(self) -> Self {
        self.register_descriptor(StoreDescriptor)
            .register_descriptor(CatalogDescriptor::<Billboard>::new())
            .register_descriptor(CatalogDescriptor::<Category>::new())
            .register_descriptor(CatalogDescriptor::<Size>::new())
            .register_descriptor(CatalogDescriptor::<Color>::new())
            .register_descriptor(CatalogDescriptor::<Product>::new())
            .register_descriptor(OrderDescriptor)
    }

    /// Add routes that don't fit the CRUD pattern
    pub fn with_custom_routes(mut self, routes: Router<Arc<ServerHost>>) -> Self {
        self.custom_routes.push(routes);
        self
    }

    fn default_payments(config: &AppConfig) -> Arc<dyn PaymentProvider> {
        match &config.payment.stripe_api_key {
            Some(key) => match &config.payment.stripe_api_base {
                Some(base) => Arc::new(StripePaymentProvider::with_api_base(key.clone(), base)),
                None => Arc::new(StripePaymentProvider::new(key.clone())),
            },
            None => {
                tracing::warn!(
                    "no payment.stripe_api_key configured, checkout uses the recording provider"
                );
                Arc::new(RecordingPaymentProvider::new())
            }
        }
    }

    /// Build the shared host
    pub fn build_host(self) -> Result<ServerHost> {
        if self.entity_registry.entity_types().is_empty() {
            anyhow::bail!(
                "No routes registered. Call .with_default_descriptors() or .register_descriptor()"
            );
        }

        let auth = self.auth.unwrap_or_else(|| {
            Arc::new(StaticTokenAuthProvider::new(self.config.auth.tokens.clone()))
        });
        let payments = match self.payments {
            Some(payments) => payments,
            None => Self::default_payments(&self.config),
        };
        let catalog = self.catalog.unwrap_or_default();

        Ok(ServerHost::new(
            self.config,
            catalog,
            auth,
            payments,
            self.entity_registry,
        ))
    }

    /// Build the final REST router
    pub fn build(mut self) -> Result<Router> {
        let custom_routes = std::mem::take(&mut self.custom_routes);
        let host = Arc::new(self.build_host()?);
        RestExposure::build_router(host, custom_routes)
    }

    /// Serve on `server.bind` until Ctrl+C or SIGTERM
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.server.bind.clone();
        let app = self.build()?;
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
