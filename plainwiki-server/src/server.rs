use crate::api::{create_router, AppState};
use plainwiki_core::{WikiConfig, WikiService};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

pub struct WikiServer {
    config: WikiConfig,
    wiki: Arc<WikiService>,
}

impl WikiServer {
    pub fn new(config: WikiConfig) -> anyhow::Result<Self> {
        let wiki = Arc::new(WikiService::from_config(&config)?);
        Ok(Self { config, wiki })
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.config.bind.parse()?)
    }

    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = self.bind_addr()?;
        let state = AppState {
            wiki: self.wiki,
            assets_dir: self.config.assets_path(),
        };

        let app = create_router(state);

        info!("Server listening on {}", addr);
        info!("Pages: {:?}", self.config.pages_path());
        info!("Assets: {:?}", self.config.assets_path());

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    pub fn wiki(&self) -> &Arc<WikiService> {
        &self.wiki
    }
}
