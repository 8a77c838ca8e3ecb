//! Sentra Server — application entry point.
//!
//! Boots logging and the database layer, then wires the auth service.
//! The HTTP surface (routing, validation, CORS, upload handling) is
//! mounted by the deployment shell on top of this core.

use std::env;
use std::fs;
use std::sync::Arc;

use sentra_auth::{AuthConfig, AuthService, LogMessageSender};
use sentra_core::ttl::MemoryTtlStore;
use sentra_db::repository::{
    SurrealAuditLogRepository, SurrealPasswordResetRepository, SurrealSessionRepository,
    SurrealUserRepository,
};
use sentra_db::{DbConfig, DbManager};
use tracing_subscriber::EnvFilter;

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn db_config_from_env() -> DbConfig {
    DbConfig {
        url: env_or("SENTRA_DB_URL", "127.0.0.1:8000"),
        namespace: env_or("SENTRA_DB_NAMESPACE", "sentra"),
        database: env_or("SENTRA_DB_DATABASE", "main"),
        username: env_or("SENTRA_DB_USER", "root"),
        password: env_or("SENTRA_DB_PASS", "root"),
    }
}

/// Load the auth configuration from the environment. Signing keys are
/// read from the PEM files named by `SENTRA_*_KEY_FILE`.
fn auth_config_from_env() -> Result<AuthConfig, String> {
    let read_pem = |key: &str| -> Result<String, String> {
        let path = env::var(key).map_err(|_| format!("{key} is not set"))?;
        fs::read_to_string(&path).map_err(|e| format!("cannot read {path}: {e}"))
    };

    Ok(AuthConfig {
        access_private_key_pem: read_pem("SENTRA_ACCESS_PRIVATE_KEY_FILE")?,
        access_public_key_pem: read_pem("SENTRA_ACCESS_PUBLIC_KEY_FILE")?,
        refresh_private_key_pem: read_pem("SENTRA_REFRESH_PRIVATE_KEY_FILE")?,
        refresh_public_key_pem: read_pem("SENTRA_REFRESH_PUBLIC_KEY_FILE")?,
        jwt_issuer: env_or("SENTRA_JWT_ISSUER", "sentra"),
        jwt_audience: env_or("SENTRA_JWT_AUDIENCE", "sentra-api"),
        pepper: env::var("SENTRA_PASSWORD_PEPPER").ok(),
        mfa_encryption_key: match env::var("SENTRA_MFA_KEY_HEX") {
            Ok(hex_key) => {
                let bytes: [u8; 32] = hex::decode(hex_key.trim())
                    .ok()
                    .and_then(|v| v.try_into().ok())
                    .ok_or("SENTRA_MFA_KEY_HEX must be 64 hex chars")?;
                Some(bytes)
            }
            Err(_) => None,
        },
        ..AuthConfig::default()
    })
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("sentra=info".parse().unwrap()),
        )
        .json()
        .init();

    tracing::info!("Starting Sentra server...");

    let auth_config = match auth_config_from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "auth configuration invalid");
            std::process::exit(1);
        }
    };

    let manager = match DbManager::connect(&db_config_from_env()).await {
        Ok(m) => m,
        Err(e) => {
            tracing::error!(error = %e, "database connection failed");
            std::process::exit(1);
        }
    };

    if let Err(e) = sentra_db::run_migrations(manager.client()).await {
        tracing::error!(error = %e, "migrations failed");
        std::process::exit(1);
    }

    let db = manager.client().clone();
    // The store-side hashing pepper must match the verifying pepper.
    let users = match auth_config.pepper.clone() {
        Some(pepper) => SurrealUserRepository::with_pepper(db.clone(), pepper),
        None => SurrealUserRepository::new(db.clone()),
    };
    let _auth = AuthService::new(
        users,
        SurrealSessionRepository::new(db.clone()),
        SurrealPasswordResetRepository::new(db.clone()),
        SurrealAuditLogRepository::new(db),
        Arc::new(LogMessageSender),
        MemoryTtlStore::new(),
        auth_config,
    );

    tracing::info!("Auth core ready");

    // TODO: mount the HTTP router (axum) once the gateway extraction
    // from the legacy deployment lands.

    tracing::info!("Sentra server stopped.");
}
