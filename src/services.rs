pub mod auth;
pub mod customer_service;
pub mod dashboard_service;
pub mod inventory_service;
pub mod menu_service;
pub mod order_service;
pub mod reservation_service;
