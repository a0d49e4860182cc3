use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use clap::{Parser, ValueEnum};
use tokio::{signal, task::JoinSet};
use tracing::{error, info};

use beauty_erp as app;
use app::ServiceRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ServiceKind {
    User,
    Inventory,
    Order,
    Gateway,
    /// Every service and the gateway in one process.
    All,
}

impl ServiceKind {
    fn roles(self) -> Vec<ServiceRole> {
        match self {
            Self::User => vec![ServiceRole::User],
            Self::Inventory => vec![ServiceRole::Inventory],
            Self::Order => vec![ServiceRole::Order],
            Self::Gateway => vec![ServiceRole::Gateway],
            Self::All => vec![
                ServiceRole::User,
                ServiceRole::Inventory,
                ServiceRole::Order,
                ServiceRole::Gateway,
            ],
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "beauty-erp", version, about = "Cosmetics retail ERP services")]
struct Cli {
    /// Which process to run
    #[arg(value_enum, default_value_t = ServiceKind::All)]
    service: ServiceKind,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = app::config::load_config().context("failed to load configuration")?;
    app::config::init_tracing(&cfg.log_level, cfg.log_json);

    let roles = cli.service.roles();
    let needs_db = roles.iter().any(|r| *r != ServiceRole::Gateway);

    let db = if needs_db {
        let pool = app::db::establish_connection_from_app_config(&cfg)
            .await
            .context("failed to connect to the database")?;
        if cfg.auto_migrate {
            app::db::run_migrations(&pool).await.map_err(|e| {
                error!("Failed running migrations: {}", e);
                e
            })?;
        }
        Some(Arc::new(pool))
    } else {
        None
    };

    let mut servers = JoinSet::new();
    for role in roles {
        let router = build_router(role, &cfg, db.clone())?;
        let addr: SocketAddr = format!("{}:{}", cfg.host, cfg.service_port(role))
            .parse()
            .with_context(|| format!("invalid listen address for {}", app::service_name(role)))?;
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;
        info!(service = app::service_name(role), %addr, "listening");

        servers.spawn(async move {
            axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(shutdown_signal())
            .await
        });
    }

    while let Some(joined) = servers.join_next().await {
        joined.context("server task panicked")??;
    }

    if let Some(db) = db {
        if let Ok(pool) = Arc::try_unwrap(db) {
            app::db::close_pool(pool).await?;
        }
    }
    info!("shutdown complete");
    Ok(())
}

fn build_router(
    role: ServiceRole,
    cfg: &app::config::AppConfig,
    db: Option<Arc<sea_orm::DatabaseConnection>>,
) -> anyhow::Result<Router> {
    if role == ServiceRole::Gateway {
        let gateway = Arc::new(app::gateway::GatewayState::from_config(cfg)?);
        let limiter = app::gateway::RateLimiter::new(app::gateway::RateLimitConfig {
            max_requests: cfg.rate_limit_max,
            window: cfg.rate_limit_window(),
        });
        app::gateway::rate_limit::spawn_cleanup_task(limiter.clone());
        return Ok(app::gateway_router(gateway, limiter, cfg));
    }

    let db = db.context("database connection required")?;
    let state = Arc::new(app::AppState::new(db, cfg.clone(), app::service_name(role)));
    app::router_for(role, state).context("no router for service")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
