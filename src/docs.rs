// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::register_staff,
        handlers::auth::get_me,

        // --- Customers ---
        handlers::customers::register,
        handlers::customers::login,
        handlers::customers::profile,
        handlers::customers::update_profile,
        handlers::customers::my_orders,

        // --- Menu ---
        handlers::menu::get_menu_items,
        handlers::menu::get_menu_item,
        handlers::menu::create_menu_item,
        handlers::menu::update_menu_item,
        handlers::menu::delete_menu_item,

        // --- Reservations ---
        handlers::reservations::create_reservation,
        handlers::reservations::get_reservations,
        handlers::reservations::get_reservation,
        handlers::reservations::update_reservation,
        handlers::reservations::delete_reservation,

        // --- Orders ---
        handlers::orders::create_order,
        handlers::orders::track_order,
        handlers::orders::get_orders,
        handlers::orders::get_order,
        handlers::orders::update_order,
        handlers::orders::delete_order,

        // --- Inventory ---
        handlers::inventory::get_inventory,
        handlers::inventory::get_low_stock,
        handlers::inventory::get_inventory_item,
        handlers::inventory::create_inventory_item,
        handlers::inventory::update_inventory_item,
        handlers::inventory::delete_inventory_item,
        handlers::inventory::import_inventory,
        handlers::inventory::export_inventory,
        handlers::inventory::get_transactions,

        // --- Dashboard ---
        handlers::dashboard::get_today_stats,
        handlers::dashboard::get_revenue_stats,
        handlers::dashboard::get_top_items,
        handlers::dashboard::get_profit_stats,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::LoginPayload,
            models::auth::RegisterStaffPayload,
            models::auth::AuthResponse,

            // --- Customers ---
            models::customer::Customer,
            models::customer::RegisterCustomerPayload,
            models::customer::LoginCustomerPayload,
            models::customer::UpdateCustomerPayload,
            models::customer::CustomerAuthResponse,

            // --- Menu ---
            models::menu::MenuCategory,
            models::menu::MenuItem,
            models::menu::CreateMenuItemPayload,
            models::menu::UpdateMenuItemPayload,

            // --- Reservations ---
            models::reservation::ReservationStatus,
            models::reservation::Reservation,
            models::reservation::CreateReservationPayload,
            models::reservation::UpdateReservationPayload,

            // --- Orders ---
            models::order::OrderStatus,
            models::order::PaymentStatus,
            models::order::PaymentMethod,
            models::order::OrderItem,
            models::order::Order,
            models::order::OrderItemPayload,
            models::order::CreateOrderPayload,
            models::order::UpdateOrderPayload,
            models::order::OrderCreatedResponse,
            models::order::TrackedOrderItem,
            models::order::OrderTrackingView,

            // --- Inventory ---
            models::inventory::ItemCategory,
            models::inventory::InventoryItem,
            models::inventory::TransactionType,
            models::inventory::TransactionLine,
            models::inventory::Transaction,
            models::inventory::TransactionView,
            models::inventory::CreateItemPayload,
            models::inventory::UpdateItemPayload,
            models::inventory::ImportLinePayload,
            models::inventory::ImportPayload,
            models::inventory::ExportLinePayload,
            models::inventory::ExportPayload,

            // --- Dashboard ---
            models::dashboard::Period,
            models::dashboard::TodayStats,
            models::dashboard::DailyRevenue,
            models::dashboard::RevenueStats,
            models::dashboard::TopItemEntry,
            models::dashboard::ProfitStats,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação da equipe"),
        (name = "Customers", description = "Contas e pedidos dos clientes"),
        (name = "Menu", description = "Cardápio do restaurante"),
        (name = "Reservations", description = "Reservas de mesa"),
        (name = "Orders", description = "Pedidos e acompanhamento"),
        (name = "Inventory", description = "Estoque e livro de movimentações"),
        (name = "Dashboard", description = "Indicadores do restaurante")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
