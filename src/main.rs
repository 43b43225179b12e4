use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info};

use mercado_ganadero::config::database::DatabaseConfig;
use mercado_ganadero::config::environment::EnvironmentConfig;
use mercado_ganadero::middleware::cors::cors_middleware;
use mercado_ganadero::routes;
use mercado_ganadero::services::upload_service::{UploadStore, MAX_IMAGE_BYTES};
use mercado_ganadero::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🐄 Mercado Ganadero - API de compraventa de bovinos");
    info!("===================================================");

    // Inicializar base de datos
    let db_config = DatabaseConfig::default();
    let pool = match db_config.create_pool().await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let env_config = EnvironmentConfig::default();

    // Preparar el directorio público de uploads
    let uploads = UploadStore::new(&env_config.uploads_dir, MAX_IMAGE_BYTES);
    if let Err(e) = uploads.ensure_dir().await {
        error!("❌ Error preparando el directorio de uploads: {}", e);
        return Err(anyhow::anyhow!("Error de uploads: {}", e));
    }

    let uploads_dir = uploads.dir().to_path_buf();
    let addr: SocketAddr = env_config.server_addr().parse()?;
    let app_state = AppState::new(pool, env_config, uploads);

    let app = Router::new()
        .route("/test", get(test_endpoint))
        .nest("/bovinos", routes::bovino_routes::create_bovino_router())
        .nest(
            "/historiales",
            routes::historial_routes::create_historial_router(),
        )
        // Las imágenes subidas se sirven como archivos estáticos
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors_middleware())
        .with_state(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /test - Endpoint de prueba");
    info!("🐂 Endpoints - Bovino:");
    info!("   GET    /bovinos - Listar bovinos (filtros: razaId, pesoMin, pesoMax, precioMin, precioMax, ubicacion)");
    info!("   POST   /bovinos - Crear bovino (multipart, imagen opcional)");
    info!("   GET    /bovinos/:id - Obtener bovino");
    info!("   PUT    /bovinos/:id - Actualizar bovino (multipart, imagen opcional)");
    info!("   DELETE /bovinos/:id - Eliminar bovino");
    info!("📋 Endpoints - Historial de reproducción:");
    info!("   GET    /historiales - Listar historiales");
    info!("   POST   /historiales - Crear historial");
    info!("   GET    /historiales/:id - Obtener historial");
    info!("   PUT    /historiales/:id - Actualizar historial");
    info!("   DELETE /historiales/:id - Eliminar historial");
    info!("🖼  Archivos estáticos:");
    info!("   GET  /uploads/* - Imágenes de bovinos");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Endpoint de prueba simple
async fn test_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "message": "¡API Mercado Ganadero funcionando correctamente!",
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
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
