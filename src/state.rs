use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::extract::FromRef;
use sqlx::postgres::PgPoolOptions;

use crate::auth::jwt::JwtKeys;
use crate::auth::service::AuthService;
use crate::auth::store::PgUserStore;
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let db = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
            tracing::warn!(error = %e, "migration failed; continuing");
        }

        let keys = JwtKeys::new(&config.jwt);
        let auth = AuthService::new(Arc::new(PgUserStore::new(db)), keys);

        Ok(Self { auth })
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::auth::store::MemoryUserStore;
        use crate::config::JwtConfig;

        let keys = JwtKeys::new(&JwtConfig {
            secret: "test-secret".into(),
            ttl_days: 7,
        });
        let auth = AuthService::new(Arc::new(MemoryUserStore::default()), keys);
        Self { auth }
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.auth.keys().clone()
    }
}
