// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Papéis fechados do sistema. "customer" existe como papel de token,
// mas nunca pode entrar no painel da equipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
    Customer,
}

// Representa um membro da equipe (admin ou garçom/cozinha).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub role: Role,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub pin_hash: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados para login da equipe (telefone + PIN)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(length(min = 8, message = "O telefone é obrigatório."))]
    #[schema(example = "0901234567")]
    pub phone: String,

    #[validate(length(min = 4, message = "O PIN deve ter no mínimo 4 dígitos."))]
    #[schema(example = "123456")]
    pub pin: String,
}

// Dados para registro de um novo membro da equipe (somente admin)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterStaffPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(length(min = 8, message = "O telefone é obrigatório."))]
    pub phone: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    #[validate(length(min = 4, message = "O PIN deve ter no mínimo 4 dígitos."))]
    pub pin: String,

    // Se omitido, o novo usuário entra como "staff".
    pub role: Option<Role>,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub role: Role,
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário ou do cliente)
    pub role: Role, // Decide qual repositório resolve o `sub`
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}
