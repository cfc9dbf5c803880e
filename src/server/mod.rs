pub mod api;

use crate::cli::ServeArgs;
use log::{ error, info, warn };
use std::error::Error;
use std::net::SocketAddr;

pub struct Server {
    args: ServeArgs,
}

impl Server {
    pub fn new(args: ServeArgs) -> Self {
        if args.answer_url.is_none() {
            warn!("No ANSWER_URL configured. /ask will report an error to the widget.");
        }
        Self { args }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let addr = self.args.server_addr.parse::<SocketAddr>()?;
        let state = api::AppState::new(self.args.answer_url.clone(), self.args.ask_rate_per_second);
        let app = api::router(state, &self.args.static_dir);

        if self.args.enable_tls {
            let (cert_path, key_path) = match (&self.args.tls_cert_path, &self.args.tls_key_path) {
                (Some(cert), Some(key)) => (cert, key),
                (Some(_), None) | (None, Some(_)) => {
                    error!("Both --tls-cert-path and --tls-key-path must be provided to enable TLS.");
                    return Err("Missing TLS certificate or key path".into());
                }
                (None, None) => {
                    error!("--enable-tls was set but no certificate/key paths provided.");
                    return Err("TLS enabled without cert/key".into());
                }
            };
            info!("TLS enabled. Loading certificate from '{}' and key from '{}'", cert_path, key_path);
            let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                cert_path,
                key_path
            ).await?;

            info!("HTTPS server listening on: https://{}", addr);
            axum_server::bind_rustls(addr, tls_config).serve(app.into_make_service()).await?;
        } else {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            info!("HTTP server listening on: http://{}", addr);
            axum::serve(listener, app.into_make_service()).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn serve_args(tls_cert_path: Option<&str>, tls_key_path: Option<&str>) -> ServeArgs {
        ServeArgs {
            server_addr: "127.0.0.1:0".to_string(),
            static_dir: "static".to_string(),
            answer_url: None,
            ask_rate_per_second: 10,
            enable_tls: true,
            tls_cert_path: tls_cert_path.map(str::to_string),
            tls_key_path: tls_key_path.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn tls_without_key_fails_before_binding() {
        let err = Server::new(serve_args(Some("cert.pem"), None)).run().await.unwrap_err();
        assert_eq!(err.to_string(), "Missing TLS certificate or key path");
    }

    #[tokio::test]
    async fn tls_without_any_paths_fails_before_binding() {
        let err = Server::new(serve_args(None, None)).run().await.unwrap_err();
        assert_eq!(err.to_string(), "TLS enabled without cert/key");
    }
}
