// src/main.rs

use axum::{
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod models;
mod services;

use crate::config::AppState;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // Lida com o Result retornado por AppState::new()
    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas por loja (dashboard, ranking, pedidos, níveis de comissão)
    let store_routes = Router::new()
        .route("/{slug}/dashboard", get(handlers::dashboard::store_dashboard))
        .route(
            "/{slug}/sellers/ranking",
            get(handlers::ranking::sellers_ranking),
        )
        .route("/{slug}/orders", post(handlers::orders::create_order))
        .route(
            "/{slug}/commission_levels",
            post(handlers::commission_levels::create_level)
                .get(handlers::commission_levels::list_levels),
        );

    // Metas: CRUD + recálculo sob demanda
    let goal_routes = Router::new()
        .route(
            "/",
            post(handlers::goals::create_goal).get(handlers::goals::list_goals),
        )
        .route("/recalculate", post(handlers::goals::recalculate_goals))
        .route(
            "/{id}",
            get(handlers::goals::get_goal)
                .put(handlers::goals::update_goal)
                .delete(handlers::goals::delete_goal),
        );

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/sellers/{id}/kpis", get(handlers::kpis::seller_kpis))
        .route(
            "/api/beta/sellers/{id}/kpis",
            get(handlers::kpis::seller_kpis_beta),
        )
        .route(
            "/api/commission_levels/{id}",
            put(handlers::commission_levels::update_level)
                .delete(handlers::commission_levels::delete_level),
        )
        .nest("/api/stores", store_routes)
        .nest("/api/goals", goal_routes)
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", docs::ApiDoc::openapi()),
        )
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
