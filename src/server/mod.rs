pub mod handlers;

use std::{net::SocketAddr, sync::Arc};

use local_ip_address::local_ip;
use tracing::{info, warn};
use warp::{filters::path::FullPath, http::HeaderMap, hyper::body::Bytes, Filter};

use crate::router::RouterFunction;

use self::handlers::Handler;

/// Largest request body accepted, in bytes.
pub const MAX_BODY_BYTES: u64 = 64 * 1024;

#[derive(Debug)]
pub struct ServerConfig<R> {
    pub host: String,
    pub port: String,
    pub router: R,
}

impl<R> ServerConfig<R> {
    pub fn new(host: &str, port: &str, router: R) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
            router,
        }
    }
}

pub struct ScoringServer;

impl ScoringServer {
    /// Serves until ctrl-c.
    pub async fn start<R>(server_config: ServerConfig<R>) -> anyhow::Result<()>
    where
        R: RouterFunction + 'static,
    {
        let router = Arc::new(server_config.router);
        let parsed_port = server_config.port.parse::<u16>()?;
        let ip: std::net::IpAddr = server_config.host.parse()?;
        let socket = SocketAddr::from((ip, parsed_port));

        let routes = Self::build_routes(&router);
        let (addr, server) = warp::serve(routes).try_bind_with_graceful_shutdown(socket, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for shutdown signal");
            }
        })?;

        match local_ip() {
            Ok(my_local_ip) => info!("Starting server at {} (local ip {})", addr, my_local_ip),
            Err(_) => info!("Starting server at {}", addr),
        }
        server.await;
        info!("server stopped");

        Ok(())
    }

    pub fn build_routes<R>(router: &Arc<R>) -> warp::filters::BoxedFilter<(impl warp::Reply,)>
    where
        R: RouterFunction + 'static,
    {
        let router = Arc::clone(router);

        warp::post()
            .and(warp::path::full())
            .and(warp::header::headers_cloned())
            .and(warp::body::content_length_limit(MAX_BODY_BYTES))
            .and(warp::body::bytes())
            .and_then(move |path: FullPath, headers: HeaderMap, body: Bytes| {
                let router_clone = router.clone();
                async move {
                    Handler::post(path.as_str().to_string(), headers, body, router_clone).await
                }
            })
            .recover(Handler::recover)
            .boxed()
    }
}
