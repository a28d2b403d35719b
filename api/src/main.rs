use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;

use lp_api::{create_app, telemetry, AppState};
use lp_core::services::{
    AccountService, AuthVerifier, BcryptPasswordHasher, Clock, CredentialRecoveryService, LoanService,
    PasswordHasher, RecoveryServiceConfig, SystemClock, TokenService, TokenServiceConfig,
};
use lp_infra::database::{DatabasePool, MySqlLoanRepository, MySqlResetCodeRepository, MySqlUserRepository};
use lp_infra::email::create_notifier;
use lp_infra::services::create_rate_limiter;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = lp_infra::config::load().context("failed to load configuration")?;
    telemetry::init_tracing(&config.logging)?;

    tracing::info!(environment = ?config.environment, "Starting loan portal API");
    if config.jwt.is_default_secret() {
        tracing::warn!("JWT_SECRET is not set, using the development secret");
    }

    let database = DatabasePool::new(config.database.clone()).await?;
    database.run_migrations().await?;
    tracing::info!(pool = %database.statistics(), "Database ready");

    let user_repository = Arc::new(MySqlUserRepository::new(database.get_pool().clone()));
    let loan_repository = Arc::new(MySqlLoanRepository::new(database.get_pool().clone()));
    let code_repository = Arc::new(MySqlResetCodeRepository::new(database.get_pool().clone()));

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let password_hasher: Arc<dyn PasswordHasher> = Arc::new(BcryptPasswordHasher::default());
    let token_service = Arc::new(TokenService::new(
        TokenServiceConfig::from(&config.jwt),
        clock.clone(),
    ));
    let rate_limiter = create_rate_limiter(&config.rate_limit, config.cache.as_ref(), clock.clone()).await?;
    let notifier = create_notifier(&config.email)?;

    let account_service = Arc::new(AccountService::new(
        user_repository.clone(),
        password_hasher.clone(),
        token_service.clone(),
        clock.clone(),
    ));
    let loan_service = Arc::new(LoanService::new(loan_repository, clock.clone()));
    let recovery_service = Arc::new(CredentialRecoveryService::new(
        user_repository,
        code_repository,
        rate_limiter,
        notifier,
        password_hasher,
        clock,
        RecoveryServiceConfig::from_settings(&config.recovery, &config.rate_limit),
    ));

    let app_state = web::Data::new(AppState {
        account_service,
        loan_service,
        recovery_service,
    });
    let verifier: Arc<dyn AuthVerifier> = token_service;
    let cors = config.cors.clone();

    let bind_address = config.server.bind_address();
    tracing::info!(address = %bind_address, "HTTP server listening");

    let mut server = HttpServer::new(move || create_app(app_state.clone(), verifier.clone(), &cors));
    if let Some(workers) = config.server.workers {
        server = server.workers(workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    database.close().await;
    Ok(())
}
