use crate::config::{Config, HumanSize};
use crate::endpoints::handlers::{share_handler, view_handler, webmap_handler};
use crate::service::BundleService;
use crate::store::MemoryBundleStore;
use crate::traits::BundleStore;
use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    routing::{MethodRouter, get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub struct AppState {
    pub service: BundleService,
    pub max_payload_bytes: usize,
}

pub struct ShareServer {
    config: Config,
    state: Arc<AppState>,
}

impl ShareServer {
    pub fn new(config: Config) -> Self {
        Self::with_store(config, Arc::new(MemoryBundleStore::new()))
    }

    pub fn with_store(config: Config, store: Arc<dyn BundleStore>) -> Self {
        let state = AppState {
            service: BundleService::new(store, config.id_length),
            max_payload_bytes: config.max_payload_bytes,
        };
        Self {
            config,
            state: Arc::new(state),
        }
    }

    pub fn router(&self) -> Router {
        let state = self.state.clone();
        let app = Router::new()
            .route("/api/share", post(share_handler))
            .route("/api/view/{id}", get(view_handler))
            .layer(DefaultBodyLimit::max(self.config.max_payload_bytes));

        // Everything else is the web client; /v/{id} is routed in the browser
        let app = match &self.config.static_dir {
            Some(dir) => {
                let index: MethodRouter = get(webmap_handler).with_state(state.clone());
                app.fallback_service(ServeDir::new(dir).fallback(index))
            }
            None => app.fallback(webmap_handler),
        };

        app.layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    pub async fn start(self) -> anyhow::Result<()> {
        let addr = SocketAddr::from((self.config.host, self.config.port));
        let listener = TcpListener::bind(addr).await?;

        println!(
            r#"
    🚀 GeoShare serving on {}

    🗺️ Drop GeoJSON files on the map
       → http://{}/

    🔗 Shared maps open read-only under
       → http://{}/v/{{id}}

    📦 Share payload limit: {}
            "#,
            addr,
            addr,
            addr,
            HumanSize(self.config.max_payload_bytes)
        );

        self.serve(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn serve(self, listener: TcpListener) -> anyhow::Result<()> {
        let app = self.router();
        tracing::info!(addr = ?listener.local_addr()?, "listening");
        axum::serve(listener, app).await?;
        Ok(())
    }
}
