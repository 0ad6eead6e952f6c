use anyhow::Result;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use dotenvy::dotenv;

use portal_contenidos::config::environment::EnvironmentConfig;
use portal_contenidos::create_router;
use portal_contenidos::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("📚 Portal de contenidos - Resolución y cache de páginas");
    info!("======================================================");

    let config = match EnvironmentConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("❌ Configuración inválida: {}", e);
            return Err(e);
        }
    };

    info!("🔗 API de contenidos: {}", config.content_api_url);
    match config.empresa_id {
        Some(empresa_id) => info!("🏢 Empresa: {}", empresa_id),
        None => warn!("⚠️ EMPRESA_ID no configurado, se cargan todos los apartados"),
    }
    match config.cache.ttl() {
        Some(ttl) => info!("🗄️ Cache con TTL de {}s", ttl.num_seconds()),
        None => info!("🗄️ Cache sin expiración"),
    }

    let addr: SocketAddr = config.server_url().parse()?;
    let app_state = AppState::new(config)?;
    let app = create_router(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("   GET  /api/paginas - Página de inicio");
    info!("   GET  /api/paginas/:slug - Página por slug");
    info!("   GET  /api/cache/stats - Estadísticas del cache");
    info!("   POST /api/cache/invalidate - Limpiar cache");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Servidor terminó con error: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
