use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::http::connection::Connection;
use crate::server::App;

pub async fn run(cfg: &ServerConfig, app: Arc<App>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("Listening on {}", cfg.listen_addr);

    loop {
        let (socket, peer) = listener.accept().await?;
        debug!("Accepted connection from {}", peer);

        let app = app.clone();
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, app);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}
