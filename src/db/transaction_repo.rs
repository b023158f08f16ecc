// src/db/transaction_repo.rs

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::inventory::{NewTransaction, Transaction, TransactionFilter},
};

// O livro de movimentações é só-acréscimo: o contrato não tem update
// nem delete, então nenhum chamador consegue reescrever o histórico.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    // Grava um lançamento com id e timestamp gerados aqui. Rejeita
    // lista de linhas vazia e total divergente da soma das linhas.
    async fn append(&self, new_transaction: NewTransaction) -> Result<Transaction, AppError>;

    // Consulta filtrada, do lançamento mais novo para o mais antigo.
    // Cada chamada refaz a varredura do começo.
    async fn query(&self, filter: TransactionFilter) -> Result<Vec<Transaction>, AppError>;
}

#[derive(Default)]
pub struct InMemoryTransactionRepository {
    entries: RwLock<Vec<Transaction>>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn append(&self, new_transaction: NewTransaction) -> Result<Transaction, AppError> {
        new_transaction.ensure_valid()?;

        let transaction = Transaction {
            id: Uuid::new_v4(),
            transaction_type: new_transaction.transaction_type,
            lines: new_transaction.lines,
            total_amount: new_transaction.total_amount,
            note: new_transaction.note,
            supplier: new_transaction.supplier,
            order_id: new_transaction.order_id,
            created_by: new_transaction.created_by,
            created_at: Utc::now(),
        };

        let mut entries = self.entries.write().await;
        entries.push(transaction.clone());
        Ok(transaction)
    }

    async fn query(&self, filter: TransactionFilter) -> Result<Vec<Transaction>, AppError> {
        let entries = self.entries.read().await;

        let mut found: Vec<Transaction> = entries
            .iter()
            .filter(|t| {
                if let Some(wanted) = filter.transaction_type {
                    if t.transaction_type != wanted {
                        return false;
                    }
                }
                if let Some((start, end_exclusive)) = filter.date_range {
                    if t.created_at < start || t.created_at >= end_exclusive {
                        return false;
                    }
                }
                if let Some(order_id) = filter.order_id {
                    if t.order_id != Some(order_id) {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();

        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::inventory::{TransactionLine, TransactionType};
    use rust_decimal::Decimal;

    fn line(quantity: i64, cost: i64) -> TransactionLine {
        TransactionLine {
            item_id: Uuid::new_v4(),
            name: "Arroz".to_string(),
            quantity,
            cost: Decimal::from(cost),
        }
    }

    fn entry(lines: Vec<TransactionLine>, total: i64) -> NewTransaction {
        NewTransaction {
            transaction_type: TransactionType::Import,
            lines,
            total_amount: Decimal::from(total),
            note: "Entrada de estoque".to_string(),
            supplier: None,
            order_id: None,
            created_by: None,
        }
    }

    #[tokio::test]
    async fn append_rejeita_lista_vazia() {
        let repo = InMemoryTransactionRepository::new();

        let result = repo.append(entry(vec![], 0)).await;

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
        assert!(repo.query(TransactionFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn append_rejeita_total_divergente() {
        let repo = InMemoryTransactionRepository::new();

        // Soma das linhas = 450000, total informado = 999.
        let result = repo.append(entry(vec![line(30, 450_000)], 999)).await;

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
        assert!(repo.query(TransactionFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn append_rejeita_quantidade_nao_positiva() {
        let repo = InMemoryTransactionRepository::new();

        let result = repo.append(entry(vec![line(0, 0)], 0)).await;

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn query_filtra_por_tipo_e_ordena_do_mais_novo() {
        let repo = InMemoryTransactionRepository::new();

        let first = repo.append(entry(vec![line(1, 100)], 100)).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let mut issue = entry(vec![line(2, 200)], 200);
        issue.transaction_type = TransactionType::Export;
        repo.append(issue).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let third = repo.append(entry(vec![line(3, 300)], 300)).await.unwrap();

        let imports = repo
            .query(TransactionFilter {
                transaction_type: Some(TransactionType::Import),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(imports.len(), 2);
        // Mais novo primeiro.
        assert_eq!(imports[0].id, third.id);
        assert_eq!(imports[1].id, first.id);
    }

    #[tokio::test]
    async fn query_filtra_por_pedido() {
        let repo = InMemoryTransactionRepository::new();
        let order_id = Uuid::new_v4();

        let mut issue = entry(vec![line(2, 200)], 200);
        issue.transaction_type = TransactionType::Export;
        issue.order_id = Some(order_id);
        repo.append(issue).await.unwrap();
        repo.append(entry(vec![line(1, 100)], 100)).await.unwrap();

        let found = repo
            .query(TransactionFilter {
                order_id: Some(order_id),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].order_id, Some(order_id));
    }
}
