// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro único, com `thiserror` para melhor ergonomia.
// Cada variante mapeia para uma classe de resposta HTTP em `into_response`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Entrada inválida detectada fora do `validator` (listas vazias,
    // quantidades não positivas, datas malformadas, total divergente...)
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0} não encontrado")]
    NotFound(String),

    // Rejeição de regra de negócio: a saída excederia o saldo em estoque.
    // Nenhuma mutação aconteceu quando este erro é retornado.
    #[error("Estoque insuficiente para '{name}': solicitado {requested}, disponível {available}")]
    InsufficientStock {
        name: String,
        requested: i64,
        available: i64,
    },

    #[error("Telefone já cadastrado")]
    PhoneAlreadyExists,

    #[error("E-mail já cadastrado")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado")]
    Forbidden,

    // Variante genérica para qualquer erro inesperado de infraestrutura.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::InvalidInput(message) => {
                let body = Json(json!({ "error": message }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),

            // A resposta carrega os números para o frontend explicar a recusa.
            AppError::InsufficientStock {
                ref name,
                requested,
                available,
            } => {
                let body = Json(json!({
                    "error": self.to_string(),
                    "item": name,
                    "requested": requested,
                    "available": available,
                }));
                return (StatusCode::CONFLICT, body).into_response();
            }

            AppError::PhoneAlreadyExists | AppError::EmailAlreadyExists => {
                (StatusCode::CONFLICT, self.to_string())
            }

            AppError::InvalidCredentials | AppError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }

            AppError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),

            // Todos os outros erros viram 500. O `tracing` loga a mensagem
            // detalhada; o cliente recebe só o genérico.
            ref e => {
                tracing::error!("Erro interno do servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
