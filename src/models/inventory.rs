// src/models/inventory.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;

// Categorias fechadas do estoque. A ordem das variantes define a ordem
// de exibição nos relatórios (derive de Ord).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum ItemCategory {
    RawMaterial,
    Seasoning,
    Beverage,
    Other,
}

// Um insumo do estoque. O campo `quantity` pertence ao livro de
// movimentações depois da criação: entradas e saídas passam sempre
// pelo InventoryService, nunca por update direto (exceto a correção
// manual explícita no update do item).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: Uuid,
    pub name: String,
    pub unit: String, // kg, litro, unidade...
    pub quantity: i64,
    pub cost_per_unit: Decimal,
    pub supplier: String,
    pub category: ItemCategory,
    pub minimum_stock: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.minimum_stock
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Import,
    Export,
}

// Linha do livro: nome e custo são um retrato do item no momento do
// movimento. Renomear o insumo depois não reescreve o histórico.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionLine {
    pub item_id: Uuid,
    pub name: String,
    pub quantity: i64,
    pub cost: Decimal,
}

// Lançamento do livro de movimentações. Imutável depois de gravado:
// o repositório não expõe update nem delete.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,

    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    pub lines: Vec<TransactionLine>,
    pub total_amount: Decimal,
    pub note: String,

    // Entrada carrega o fornecedor; saída pode referenciar um pedido.
    pub supplier: Option<String>,
    pub order_id: Option<Uuid>,

    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

// Lançamento ainda sem id/timestamp, como o serviço entrega ao
// repositório para gravação.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub transaction_type: TransactionType,
    pub lines: Vec<TransactionLine>,
    pub total_amount: Decimal,
    pub note: String,
    pub supplier: Option<String>,
    pub order_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
}

impl NewTransaction {
    // Defesa em profundidade abaixo do serviço: nenhuma implementação de
    // repositório pode aceitar lista vazia ou total divergente da soma.
    pub fn ensure_valid(&self) -> Result<(), AppError> {
        if self.lines.is_empty() {
            return Err(AppError::InvalidInput(
                "A movimentação precisa de ao menos uma linha.".to_string(),
            ));
        }

        let mut sum = Decimal::ZERO;
        for line in &self.lines {
            if line.quantity <= 0 {
                return Err(AppError::InvalidInput(
                    "A quantidade de cada linha deve ser maior que zero.".to_string(),
                ));
            }
            sum += line.cost;
        }

        if sum != self.total_amount {
            return Err(AppError::InvalidInput(
                "O total da movimentação não confere com a soma das linhas.".to_string(),
            ));
        }

        Ok(())
    }
}

// Filtro da consulta do livro (tudo opcional = lista completa).
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub transaction_type: Option<TransactionType>,
    // Intervalo [início, fim) em UTC.
    pub date_range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub order_id: Option<Uuid>,
}

// Lançamento com as referências resolvidas para exibição
// (nome de quem criou, código do pedido).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    pub id: Uuid,

    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    pub lines: Vec<TransactionLine>,
    pub total_amount: Decimal,
    pub note: String,
    pub supplier: Option<String>,
    pub order_id: Option<Uuid>,
    pub order_code: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_by_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Arroz")]
    pub name: String,

    #[validate(length(min = 1, message = "A unidade é obrigatória."))]
    #[schema(example = "kg")]
    pub unit: String,

    // Estoque inicial. Se o JSON não tiver esse campo, assume 0.
    #[serde(default)]
    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    pub quantity: i64,

    #[validate(custom(function = "crate::models::validate_not_negative"))]
    pub cost_per_unit: Decimal,

    pub supplier: Option<String>,
    pub category: Option<ItemCategory>,

    #[validate(range(min = 0, message = "O estoque mínimo não pode ser negativo."))]
    pub minimum_stock: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemPayload {
    pub name: Option<String>,
    pub unit: Option<String>,

    // Correção manual de saldo, fora do livro (uso excepcional).
    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    pub quantity: Option<i64>,

    #[validate(custom(function = "crate::models::validate_not_negative"))]
    pub cost_per_unit: Option<Decimal>,

    pub supplier: Option<String>,
    pub category: Option<ItemCategory>,

    #[validate(range(min = 0, message = "O estoque mínimo não pode ser negativo."))]
    pub minimum_stock: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportLinePayload {
    // Referência do item no estoque
    pub item: Uuid,

    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    pub quantity: i64,

    // Custo unitário pago nesta compra. Se omitido, vale o custo
    // cadastrado do item.
    #[validate(custom(function = "crate::models::validate_not_negative"))]
    pub cost: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportPayload {
    #[validate(length(min = 1, message = "Informe a lista de itens da entrada."), nested)]
    pub items: Vec<ImportLinePayload>,

    pub supplier: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportLinePayload {
    pub item: Uuid,

    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    pub quantity: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload {
    #[validate(length(min = 1, message = "Informe a lista de itens da saída."), nested)]
    pub items: Vec<ExportLinePayload>,

    pub order_id: Option<Uuid>,
    pub note: Option<String>,
}
