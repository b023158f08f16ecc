// src/config.rs

use std::{env, sync::Arc};

use crate::{
    common::error::AppError,
    db::{
        CustomerRepository, InMemoryCustomerRepository, InMemoryInventoryRepository,
        InMemoryMenuRepository, InMemoryOrderRepository, InMemoryReservationRepository,
        InMemoryTransactionRepository, InMemoryUserRepository, InventoryRepository,
        MenuRepository, OrderRepository, ReservationRepository, TransactionRepository,
        UserRepository,
    },
    models::auth::{RegisterStaffPayload, Role},
    services::{
        auth::AuthService, customer_service::CustomerService, dashboard_service::DashboardService,
        inventory_service::InventoryService, menu_service::MenuService,
        order_service::OrderService, reservation_service::ReservationService,
    },
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub customer_service: CustomerService,
    pub menu_service: MenuService,
    pub reservation_service: ReservationService,
    pub order_service: OrderService,
    pub inventory_service: InventoryService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    // Carrega as configurações e monta o gráfico de dependências
    // (coleções -> serviços). Retorna Result: se algo falhar aqui, a
    // aplicação não deve subir.
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| "quananque2025".to_string());

        // --- Coleções (uma por entidade, chaveadas por id) ---
        // A persistência durável fica fora daqui: qualquer banco entra
        // implementando os mesmos traits de repositório.
        let user_repo: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
        let customer_repo: Arc<dyn CustomerRepository> =
            Arc::new(InMemoryCustomerRepository::new());
        let menu_repo: Arc<dyn MenuRepository> = Arc::new(InMemoryMenuRepository::new());
        let reservation_repo: Arc<dyn ReservationRepository> =
            Arc::new(InMemoryReservationRepository::new());
        let order_repo: Arc<dyn OrderRepository> = Arc::new(InMemoryOrderRepository::new());
        let inventory_repo: Arc<dyn InventoryRepository> =
            Arc::new(InMemoryInventoryRepository::new());
        let transaction_repo: Arc<dyn TransactionRepository> =
            Arc::new(InMemoryTransactionRepository::new());

        // --- Monta o gráfico de dependências ---
        let auth_service = AuthService::new(user_repo.clone(), jwt_secret);
        let customer_service = CustomerService::new(
            customer_repo.clone(),
            order_repo.clone(),
            auth_service.clone(),
        );
        let menu_service = MenuService::new(menu_repo.clone());
        let reservation_service = ReservationService::new(reservation_repo.clone());
        let order_service =
            OrderService::new(order_repo.clone(), menu_repo.clone(), customer_repo.clone());
        let inventory_service = InventoryService::new(
            inventory_repo,
            transaction_repo.clone(),
            user_repo,
            order_repo.clone(),
        );
        let dashboard_service =
            DashboardService::new(order_repo, reservation_repo, transaction_repo);

        let state = Self {
            auth_service,
            customer_service,
            menu_service,
            reservation_service,
            order_service,
            inventory_service,
            dashboard_service,
        };

        state.seed_admin().await?;

        Ok(state)
    }

    // Cria o admin inicial a partir do .env (ADMIN_PHONE/ADMIN_PIN),
    // para o primeiro login funcionar num ambiente recém-subido.
    async fn seed_admin(&self) -> anyhow::Result<()> {
        let (Ok(phone), Ok(pin)) = (env::var("ADMIN_PHONE"), env::var("ADMIN_PIN")) else {
            return Ok(());
        };

        let payload = RegisterStaffPayload {
            name: env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrador".to_string()),
            phone,
            email: None,
            pin,
            role: Some(Role::Admin),
        };

        match self.auth_service.register_staff(payload).await {
            Ok(user) => {
                tracing::info!("👤 Admin inicial criado: {}", user.phone);
                Ok(())
            }
            // Já existia (reinício com as mesmas variáveis): segue o jogo.
            Err(AppError::PhoneAlreadyExists) => Ok(()),
            Err(e) => Err(anyhow::anyhow!("Falha ao criar o admin inicial: {}", e)),
        }
    }
}
