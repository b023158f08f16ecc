// src/services/customer_service.rs

use std::sync::Arc;

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CustomerRepository, OrderRepository},
    models::{
        auth::Role,
        customer::{
            Customer, CustomerAuthResponse, LoginCustomerPayload, RegisterCustomerPayload,
            UpdateCustomerPayload,
        },
        order::Order,
    },
    services::auth::AuthService,
};

#[derive(Clone)]
pub struct CustomerService {
    customer_repo: Arc<dyn CustomerRepository>,
    order_repo: Arc<dyn OrderRepository>,
    // Reaproveita a emissão/validação de token da equipe, com papel
    // "customer" nos claims.
    auth_service: AuthService,
}

impl CustomerService {
    pub fn new(
        customer_repo: Arc<dyn CustomerRepository>,
        order_repo: Arc<dyn OrderRepository>,
        auth_service: AuthService,
    ) -> Self {
        Self {
            customer_repo,
            order_repo,
            auth_service,
        }
    }

    pub async fn register(
        &self,
        payload: RegisterCustomerPayload,
    ) -> Result<CustomerAuthResponse, AppError> {
        let email = payload.email.trim().to_lowercase();

        let password_clone = payload.password.clone();
        let password_hash = tokio::task::spawn_blocking(move || hash(&password_clone, DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing da senha: {}", e))??;

        let now = Utc::now();
        let customer = Customer {
            id: Uuid::new_v4(),
            name: payload.name,
            email,
            phone: payload.phone,
            password_hash,
            address: payload.address,
            order_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        // O repositório garante a unicidade do e-mail.
        let customer = self.customer_repo.insert(customer).await?;
        self.auth_response(customer)
    }

    pub async fn login(
        &self,
        payload: LoginCustomerPayload,
    ) -> Result<CustomerAuthResponse, AppError> {
        let email = payload.email.trim().to_lowercase();
        let customer = self
            .customer_repo
            .find_by_email(&email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = payload.password.clone();
        let password_hash_clone = customer.password_hash.clone();
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.auth_response(customer)
    }

    pub async fn profile(&self, customer_id: Uuid) -> Result<Customer, AppError> {
        self.customer_repo
            .find_by_id(customer_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cliente".to_string()))
    }

    pub async fn find_customer(&self, customer_id: Uuid) -> Result<Option<Customer>, AppError> {
        self.customer_repo.find_by_id(customer_id).await
    }

    // Atualização parcial do perfil. Como no fluxo original, devolve um
    // token novo junto com os dados atualizados.
    pub async fn update_profile(
        &self,
        customer_id: Uuid,
        payload: UpdateCustomerPayload,
    ) -> Result<CustomerAuthResponse, AppError> {
        let mut customer = self.profile(customer_id).await?;

        if let Some(name) = payload.name {
            customer.name = name;
        }
        if let Some(email) = payload.email {
            customer.email = email.trim().to_lowercase();
        }
        if let Some(phone) = payload.phone {
            customer.phone = phone;
        }
        if let Some(address) = payload.address {
            customer.address = Some(address);
        }
        if let Some(password) = payload.password {
            let password_hash = tokio::task::spawn_blocking(move || hash(&password, DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing da senha: {}", e))??;
            customer.password_hash = password_hash;
        }
        customer.updated_at = Utc::now();

        let customer = self.customer_repo.update(customer).await?;
        self.auth_response(customer)
    }

    // Histórico de pedidos do cliente: tudo que bate com o e-mail OU o
    // telefone da conta, inclusive pedidos feitos sem login.
    pub async fn orders(&self, customer_id: Uuid) -> Result<Vec<Order>, AppError> {
        let customer = self.profile(customer_id).await?;
        self.order_repo
            .find_by_contact(&customer.email, &customer.phone)
            .await
    }

    fn auth_response(&self, customer: Customer) -> Result<CustomerAuthResponse, AppError> {
        let token = self.auth_service.create_token(customer.id, Role::Customer)?;
        Ok(CustomerAuthResponse {
            id: customer.id,
            name: customer.name,
            email: customer.email,
            phone: customer.phone,
            token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{InMemoryCustomerRepository, InMemoryOrderRepository, InMemoryUserRepository};

    fn service() -> CustomerService {
        let auth_service = AuthService::new(
            Arc::new(InMemoryUserRepository::new()),
            "segredo-de-teste".to_string(),
        );
        CustomerService::new(
            Arc::new(InMemoryCustomerRepository::new()),
            Arc::new(InMemoryOrderRepository::new()),
            auth_service,
        )
    }

    fn register_payload(email: &str) -> RegisterCustomerPayload {
        RegisterCustomerPayload {
            name: "Cliente".to_string(),
            email: email.to_string(),
            phone: "0901234567".to_string(),
            password: "senha-forte".to_string(),
            address: None,
        }
    }

    #[tokio::test]
    async fn registro_normaliza_email_e_permite_login() {
        let service = service();

        let created = service
            .register(register_payload("Cliente@Exemplo.COM"))
            .await
            .unwrap();
        assert_eq!(created.email, "cliente@exemplo.com");

        let logged = service
            .login(LoginCustomerPayload {
                email: "cliente@exemplo.com".to_string(),
                password: "senha-forte".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(logged.id, created.id);
    }

    #[tokio::test]
    async fn email_duplicado_e_senha_errada_sao_recusados() {
        let service = service();
        service.register(register_payload("a@b.com")).await.unwrap();

        let err = service.register(register_payload("a@b.com")).await.unwrap_err();
        assert!(matches!(err, AppError::EmailAlreadyExists));

        let err = service
            .login(LoginCustomerPayload {
                email: "a@b.com".to_string(),
                password: "senha-errada".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }
}
