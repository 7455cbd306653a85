//! # Harvest Auth Server
//!
//! Standalone scaffold wiring the recovery plugin to a store and a mail
//! dispatcher. The HTTP frontend translates its native requests into
//! router [`Request`] values and calls [`RecoveryServer::dispatch`].

mod config;

pub use config::{RecoverySettings, ServerConfig, SmtpSettings};

use std::sync::Arc;

use harvest_auth_adapter_memory::MemoryStore;
use harvest_auth_core::error::RecoveryResult;
use harvest_auth_core::router::{Request, Response, Router};
use harvest_auth_core::schema::SchemaBuilder;
use harvest_auth_core::traits::{AuthPlugin, MailDispatcher, RecoveryStore};
use harvest_auth_mailer::{LogMailer, SmtpConfig, SmtpMailer};
use harvest_auth_plugin_recovery::{PasswordPolicy, RecoveryConfig, RecoveryPlugin, RecoverySchema};

/// The recovery server: configuration, collaborators, and routes.
pub struct RecoveryServer {
    /// Server configuration.
    pub config: ServerConfig,
    store: Arc<dyn RecoveryStore>,
    router: Router,
}

impl RecoveryServer {
    /// Builds a server from configuration.
    ///
    /// Uses the in-memory store; a SQL-backed adapter slots in through the
    /// same `RecoveryStore` seam. The mail dispatcher is SMTP when
    /// configured, log-only otherwise.
    pub fn from_config(config: ServerConfig) -> RecoveryResult<Self> {
        let store: Arc<dyn RecoveryStore> = Arc::new(MemoryStore::new());

        let mailer: Arc<dyn MailDispatcher> = match &config.smtp {
            Some(smtp) => Arc::new(SmtpMailer::new(&SmtpConfig {
                host: smtp.host.clone(),
                port: smtp.port,
                username: smtp.username.clone(),
                password: smtp.password.clone(),
                from: smtp.from.clone(),
            })?),
            None => Arc::new(LogMailer::new()),
        };

        let recovery_config = RecoveryConfig::new()
            .code_ttl_secs(config.recovery.code_ttl_secs)
            .token_ttl_secs(config.recovery.token_ttl_secs)
            .password_policy(
                PasswordPolicy::new().min_length(config.recovery.min_password_length),
            );
        let plugin = RecoveryPlugin::new(Arc::clone(&store), mailer, recovery_config);

        let mut router = Router::new(config.base_path.clone());
        plugin.register_routes(&mut router);

        Ok(Self {
            config,
            store,
            router,
        })
    }

    /// Returns the mounted router.
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Dispatches a request to the matching route.
    pub async fn dispatch(&self, req: Request) -> Response {
        match self.router.find(req.method, &req.path) {
            Some(route) => route.handler.handle(req).await,
            None => Response::not_found().json(serde_json::json!({
                "error": {
                    "code": "NOT_FOUND",
                    "message": "No such route"
                }
            })),
        }
    }

    /// Applies the fixed schema and reports readiness.
    pub async fn run(&self) -> RecoveryResult<()> {
        let schema = SchemaBuilder::with_core()
            .define_model::<RecoverySchema>()
            .build();
        self.store.migrate(&schema.models).await?;

        tracing::info!(
            host = %self.config.host,
            port = self.config.port,
            routes = self.router.len(),
            "recovery server ready"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvest_auth_core::router::Method;

    #[tokio::test]
    async fn test_server_mounts_recovery_routes() {
        let server = RecoveryServer::from_config(ServerConfig::default()).unwrap();
        assert_eq!(server.router().len(), 4);

        let resp = server
            .dispatch(Request::new(Method::POST, "/recovery/unknown"))
            .await;
        assert_eq!(resp.status, 404);
    }

    #[tokio::test]
    async fn test_dispatch_reaches_handlers() {
        let server = RecoveryServer::from_config(ServerConfig::default()).unwrap();

        // Unknown account: the anti-enumeration receipt still comes back.
        let resp = server
            .dispatch(
                Request::new(Method::POST, "/recovery/request-code").with_body(
                    serde_json::json!({"email": "ghost@example.com", "username": "ghost"}),
                ),
            )
            .await;
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body.unwrap()["accepted"], true);
    }

    #[tokio::test]
    async fn test_run_applies_schema() {
        let server = RecoveryServer::from_config(ServerConfig::default()).unwrap();
        server.run().await.unwrap();
    }
}
