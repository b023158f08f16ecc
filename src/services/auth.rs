// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{AuthResponse, Claims, RegisterStaffPayload, Role, User},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(user_repo: Arc<dyn UserRepository>, jwt_secret: String) -> Self {
        Self {
            user_repo,
            jwt_secret,
        }
    }

    // Login da equipe por telefone + PIN.
    pub async fn login(&self, phone: &str, pin: &str) -> Result<AuthResponse, AppError> {
        let user = self
            .user_repo
            .find_by_phone(phone)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        // Conta de cliente não entra no painel da equipe.
        if user.role == Role::Customer {
            return Err(AppError::Forbidden);
        }

        let pin_clone = pin.to_owned();
        let pin_hash_clone = user.pin_hash.clone();

        // Executa a verificação do bcrypt fora do executor async.
        let is_pin_valid = tokio::task::spawn_blocking(move || verify(&pin_clone, &pin_hash_clone))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação do PIN: {}", e))??;

        if !is_pin_valid {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.create_token(user.id, user.role)?;
        Ok(AuthResponse {
            id: user.id,
            name: user.name,
            phone: user.phone,
            email: user.email,
            role: user.role,
            token,
        })
    }

    // Cadastro de um novo membro da equipe. A exigência de admin fica
    // no handler (extrator), aqui é só a regra de criação.
    pub async fn register_staff(&self, payload: RegisterStaffPayload) -> Result<User, AppError> {
        if self
            .user_repo
            .find_by_phone(&payload.phone)
            .await?
            .is_some()
        {
            return Err(AppError::PhoneAlreadyExists);
        }

        let pin_clone = payload.pin.clone();
        let pin_hash = tokio::task::spawn_blocking(move || hash(&pin_clone, DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing do PIN: {}", e))??;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: payload.name,
            phone: payload.phone,
            email: payload.email,
            role: payload.role.unwrap_or(Role::Staff),
            pin_hash,
            created_at: now,
            updated_at: now,
        };

        self.user_repo.insert(user).await
    }

    pub async fn me(&self, user_id: Uuid) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuário".to_string()))
    }

    pub async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        self.user_repo.find_by_id(user_id).await
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        Ok(token_data.claims)
    }

    pub fn create_token(&self, subject: Uuid, role: Role) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(30);

        let claims = Claims {
            sub: subject,
            role,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        // Usa '?' para um tratamento de erro mais limpo
        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryUserRepository;

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(InMemoryUserRepository::new()),
            "segredo-de-teste".to_string(),
        )
    }

    fn staff_payload(phone: &str) -> RegisterStaffPayload {
        RegisterStaffPayload {
            name: "Garçom".to_string(),
            phone: phone.to_string(),
            email: None,
            pin: "123456".to_string(),
            role: None,
        }
    }

    #[tokio::test]
    async fn registro_e_login_com_pin_correto() {
        let service = service();
        let user = service.register_staff(staff_payload("0901234567")).await.unwrap();
        assert_eq!(user.role, Role::Staff);

        let auth = service.login("0901234567", "123456").await.unwrap();
        assert_eq!(auth.id, user.id);

        // O token emitido volta com o mesmo sujeito e papel.
        let claims = service.validate_token(&auth.token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, Role::Staff);
    }

    #[tokio::test]
    async fn pin_errado_e_telefone_duplicado_sao_recusados() {
        let service = service();
        service.register_staff(staff_payload("0901234567")).await.unwrap();

        let err = service.login("0901234567", "000000").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));

        let err = service
            .register_staff(staff_payload("0901234567"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PhoneAlreadyExists));
    }

    #[tokio::test]
    async fn token_adulterado_e_recusado() {
        let service = service();
        let err = service.validate_token("um-token-qualquer").unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }
}
