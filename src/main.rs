//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
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
mod middleware;
mod models;
mod services;

// Importações principais
use crate::config::AppState;
use crate::middleware::auth::{auth_guard, customer_guard};

#[tokio::main]
async fn main() {
    // Inicializa o logger.
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não
    // deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Rotas de autenticação: login é público; registro e perfil ficam
    // atrás do guardião da equipe.
    let auth_private = Router::new()
        .route("/register", post(handlers::auth::register_staff))
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));
    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .merge(auth_private);

    // Cardápio: leitura pública, escrita só de admin (o extrator
    // AdminUser valida o token direto na rota).
    let menu_routes = Router::new()
        .route(
            "/",
            get(handlers::menu::get_menu_items).post(handlers::menu::create_menu_item),
        )
        .route(
            "/{id}",
            get(handlers::menu::get_menu_item)
                .put(handlers::menu::update_menu_item)
                .delete(handlers::menu::delete_menu_item),
        );

    // Reservas: o cliente cria pelo site; o resto é da equipe.
    let reservation_routes = Router::new()
        .route(
            "/",
            post(handlers::reservations::create_reservation)
                .get(handlers::reservations::get_reservations),
        )
        .route(
            "/{id}",
            get(handlers::reservations::get_reservation)
                .put(handlers::reservations::update_reservation)
                .delete(handlers::reservations::delete_reservation),
        );

    // Pedidos: criação e acompanhamento são públicos; gestão é da equipe.
    let order_routes = Router::new()
        .route(
            "/",
            post(handlers::orders::create_order).get(handlers::orders::get_orders),
        )
        .route("/track/{code}", get(handlers::orders::track_order))
        .route(
            "/{id}",
            get(handlers::orders::get_order)
                .put(handlers::orders::update_order)
                .delete(handlers::orders::delete_order),
        );

    // Estoque: tudo atrás do guardião da equipe.
    let inventory_routes = Router::new()
        .route(
            "/",
            get(handlers::inventory::get_inventory).post(handlers::inventory::create_inventory_item),
        )
        .route("/low-stock", get(handlers::inventory::get_low_stock))
        .route("/import", post(handlers::inventory::import_inventory))
        .route("/export", post(handlers::inventory::export_inventory))
        .route("/transactions", get(handlers::inventory::get_transactions))
        .route(
            "/{id}",
            get(handlers::inventory::get_inventory_item)
                .put(handlers::inventory::update_inventory_item)
                .delete(handlers::inventory::delete_inventory_item),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let dashboard_routes = Router::new()
        .route("/today", get(handlers::dashboard::get_today_stats))
        .route("/revenue", get(handlers::dashboard::get_revenue_stats))
        .route("/top-items", get(handlers::dashboard::get_top_items))
        .route("/profit", get(handlers::dashboard::get_profit_stats))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Conta do cliente: registro/login públicos, /me atrás do guardião
    // de cliente.
    let customer_account = Router::new()
        .route(
            "/me",
            get(handlers::customers::profile).put(handlers::customers::update_profile),
        )
        .route("/me/orders", get(handlers::customers::my_orders))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            customer_guard,
        ));
    let customer_routes = Router::new()
        .route("/register", post(handlers::customers::register))
        .route("/login", post(handlers::customers::login))
        .merge(customer_account);

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/menu", menu_routes)
        .nest("/api/reservations", reservation_routes)
        .nest("/api/orders", order_routes)
        .nest("/api/inventory", inventory_routes)
        .nest("/api/dashboard", dashboard_routes)
        .nest("/api/customers", customer_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let port = std::env::var("PORT")
        .ok()
        .and_then(|raw| raw.parse::<u16>().ok())
        .unwrap_or(5000);
    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", addr);
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
