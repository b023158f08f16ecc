// src/services/inventory_service.rs

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{InventoryRepository, OrderRepository, TransactionRepository, UserRepository},
    models::inventory::{
        CreateItemPayload, InventoryItem, ItemCategory, NewTransaction, Transaction,
        TransactionFilter, TransactionLine, TransactionType, TransactionView, UpdateItemPayload,
    },
};

// Uma linha da entrada de estoque, já tipada para o serviço.
#[derive(Debug, Clone)]
pub struct ImportLine {
    pub item_id: Uuid,
    pub quantity: i64,
    // Custo unitário pago nesta compra; se None, vale o custo
    // cadastrado do item.
    pub unit_cost: Option<Decimal>,
}

#[derive(Debug, Clone)]
pub struct ExportLine {
    pub item_id: Uuid,
    pub quantity: i64,
}

// Registro de locks por item. Toda operação do livro que toca um item
// precisa do lock dele: é isso que lineariza o check-then-act da saída
// e impede duas saídas concorrentes de furarem o saldo.
#[derive(Default)]
struct ItemLocks {
    locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl ItemLocks {
    // Adquire os locks em ordem crescente de id (ordem global fixa),
    // para que operações com itens em comum nunca se travem em ciclo.
    async fn acquire(&self, ids: &[Uuid]) -> Vec<OwnedMutexGuard<()>> {
        let mut unique: Vec<Uuid> = ids.to_vec();
        unique.sort();
        unique.dedup();

        let handles: Vec<Arc<Mutex<()>>> = {
            let mut map = self.locks.lock().await;
            unique
                .iter()
                .map(|id| map.entry(*id).or_default().clone())
                .collect()
        };

        let mut guards = Vec::with_capacity(handles.len());
        for handle in handles {
            guards.push(handle.lock_owned().await);
        }
        guards
    }
}

#[derive(Clone)]
pub struct InventoryService {
    inventory_repo: Arc<dyn InventoryRepository>,
    transaction_repo: Arc<dyn TransactionRepository>,
    user_repo: Arc<dyn UserRepository>,
    order_repo: Arc<dyn OrderRepository>,
    item_locks: Arc<ItemLocks>,
}

impl InventoryService {
    pub fn new(
        inventory_repo: Arc<dyn InventoryRepository>,
        transaction_repo: Arc<dyn TransactionRepository>,
        user_repo: Arc<dyn UserRepository>,
        order_repo: Arc<dyn OrderRepository>,
    ) -> Self {
        Self {
            inventory_repo,
            transaction_repo,
            user_repo,
            order_repo,
            item_locks: Arc::new(ItemLocks::default()),
        }
    }

    // ---
    // CRUD de itens
    // ---

    pub async fn create_item(&self, payload: CreateItemPayload) -> Result<InventoryItem, AppError> {
        let now = Utc::now();
        let item = InventoryItem {
            id: Uuid::new_v4(),
            name: payload.name,
            unit: payload.unit,
            quantity: payload.quantity,
            cost_per_unit: payload.cost_per_unit,
            supplier: payload.supplier.unwrap_or_default(),
            category: payload.category.unwrap_or(ItemCategory::RawMaterial),
            minimum_stock: payload.minimum_stock.unwrap_or(5),
            created_at: now,
            updated_at: now,
        };
        self.inventory_repo.insert(item).await
    }

    pub async fn get_items(&self) -> Result<Vec<InventoryItem>, AppError> {
        self.inventory_repo.list_all().await
    }

    pub async fn get_item(&self, id: Uuid) -> Result<InventoryItem, AppError> {
        self.inventory_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Item de estoque".to_string()))
    }

    // Atualização cadastral. A troca direta de `quantity` é a correção
    // manual de saldo, fora do livro; por isso também entra no lock.
    pub async fn update_item(
        &self,
        id: Uuid,
        payload: UpdateItemPayload,
    ) -> Result<InventoryItem, AppError> {
        let _guards = self.item_locks.acquire(&[id]).await;

        let mut item = self.get_item(id).await?;

        if let Some(name) = payload.name {
            item.name = name;
        }
        if let Some(unit) = payload.unit {
            item.unit = unit;
        }
        if let Some(quantity) = payload.quantity {
            item.quantity = quantity;
        }
        if let Some(cost_per_unit) = payload.cost_per_unit {
            item.cost_per_unit = cost_per_unit;
        }
        if let Some(supplier) = payload.supplier {
            item.supplier = supplier;
        }
        if let Some(category) = payload.category {
            item.category = category;
        }
        if let Some(minimum_stock) = payload.minimum_stock {
            item.minimum_stock = minimum_stock;
        }
        item.updated_at = Utc::now();

        self.inventory_repo.update(item).await
    }

    pub async fn delete_item(&self, id: Uuid) -> Result<(), AppError> {
        let _guards = self.item_locks.acquire(&[id]).await;
        self.inventory_repo.delete(id).await
    }

    // Itens no saldo mínimo ou abaixo, já na ordem categoria + nome.
    pub async fn low_stock(&self) -> Result<Vec<InventoryItem>, AppError> {
        let items = self.inventory_repo.list_all().await?;
        Ok(items.into_iter().filter(|i| i.is_low_stock()).collect())
    }

    // ---
    // Livro de movimentações
    // ---

    // Entrada de estoque (compra). Em três fases, com os locks dos
    // itens presos do começo ao fim:
    //   1. resolve todos os itens e monta as linhas, sem mutar nada;
    //   2. grava os novos saldos, desfazendo o que já foi gravado se
    //      alguma escrita falhar;
    //   3. grava o lançamento no livro, desfazendo os saldos se a
    //      gravação falhar.
    // O total é sempre a soma das linhas calculada aqui; nenhum valor
    // do chamador entra direto no livro.
    pub async fn apply_import(
        &self,
        lines: Vec<ImportLine>,
        supplier: Option<String>,
        note: Option<String>,
        created_by: Option<Uuid>,
    ) -> Result<Transaction, AppError> {
        if lines.is_empty() {
            return Err(AppError::InvalidInput(
                "Informe a lista de itens da entrada.".to_string(),
            ));
        }
        for line in &lines {
            if line.quantity <= 0 {
                return Err(AppError::InvalidInput(
                    "A quantidade de cada linha deve ser maior que zero.".to_string(),
                ));
            }
            if let Some(cost) = line.unit_cost {
                if cost.is_sign_negative() {
                    return Err(AppError::InvalidInput(
                        "O custo unitário não pode ser negativo.".to_string(),
                    ));
                }
            }
        }

        let ids: Vec<Uuid> = lines.iter().map(|l| l.item_id).collect();
        let _guards = self.item_locks.acquire(&ids).await;

        // Fase 1: resolução. `staged` acompanha o saldo projetado de
        // cada item para o caso de linhas repetidas no mesmo pedido.
        let mut staged: Vec<(InventoryItem, i64)> = Vec::new();
        let mut index: HashMap<Uuid, usize> = HashMap::new();
        let mut tx_lines: Vec<TransactionLine> = Vec::with_capacity(lines.len());
        let mut total = Decimal::ZERO;

        for line in &lines {
            let idx = match index.get(&line.item_id) {
                Some(idx) => *idx,
                None => {
                    let item = self
                        .inventory_repo
                        .find_by_id(line.item_id)
                        .await?
                        .ok_or_else(|| {
                            AppError::NotFound(format!("Item de estoque {}", line.item_id))
                        })?;
                    staged.push((item, 0));
                    index.insert(line.item_id, staged.len() - 1);
                    staged.len() - 1
                }
            };

            let (item, delta) = &mut staged[idx];
            *delta += line.quantity;

            let unit_cost = line.unit_cost.unwrap_or(item.cost_per_unit);
            let cost = unit_cost * Decimal::from(line.quantity);
            total += cost;
            tx_lines.push(TransactionLine {
                item_id: item.id,
                name: item.name.clone(),
                quantity: line.quantity,
                cost,
            });
        }

        // Fases 2 e 3.
        self.commit_quantities(&staged).await?;

        let entry = NewTransaction {
            transaction_type: TransactionType::Import,
            lines: tx_lines,
            total_amount: total,
            note: note.unwrap_or_else(|| "Entrada de estoque".to_string()),
            supplier,
            order_id: None,
            created_by,
        };
        self.append_or_rollback(entry, &staged).await
    }

    // Saída de estoque (consumo/venda). Valida TODAS as linhas contra o
    // saldo atual antes de decrementar qualquer item; só depois aplica.
    // O custo de cada linha sai do custo cadastrado do item, nunca do
    // chamador, para o livro continuar confiável.
    pub async fn apply_export(
        &self,
        lines: Vec<ExportLine>,
        order_id: Option<Uuid>,
        note: Option<String>,
        created_by: Option<Uuid>,
    ) -> Result<Transaction, AppError> {
        if lines.is_empty() {
            return Err(AppError::InvalidInput(
                "Informe a lista de itens da saída.".to_string(),
            ));
        }
        for line in &lines {
            if line.quantity <= 0 {
                return Err(AppError::InvalidInput(
                    "A quantidade de cada linha deve ser maior que zero.".to_string(),
                ));
            }
        }

        let ids: Vec<Uuid> = lines.iter().map(|l| l.item_id).collect();
        let _guards = self.item_locks.acquire(&ids).await;

        // Fase 1: valida tudo sem mutar nada.
        let mut staged: Vec<(InventoryItem, i64)> = Vec::new();
        let mut index: HashMap<Uuid, usize> = HashMap::new();
        let mut tx_lines: Vec<TransactionLine> = Vec::with_capacity(lines.len());
        let mut total = Decimal::ZERO;

        for line in &lines {
            let idx = match index.get(&line.item_id) {
                Some(idx) => *idx,
                None => {
                    let item = self
                        .inventory_repo
                        .find_by_id(line.item_id)
                        .await?
                        .ok_or_else(|| {
                            AppError::NotFound(format!("Item de estoque {}", line.item_id))
                        })?;
                    staged.push((item, 0));
                    index.insert(line.item_id, staged.len() - 1);
                    staged.len() - 1
                }
            };

            let (item, delta) = &mut staged[idx];
            let available = item.quantity + *delta;
            if line.quantity > available {
                return Err(AppError::InsufficientStock {
                    name: item.name.clone(),
                    requested: line.quantity,
                    available,
                });
            }
            *delta -= line.quantity;

            let cost = item.cost_per_unit * Decimal::from(line.quantity);
            total += cost;
            tx_lines.push(TransactionLine {
                item_id: item.id,
                name: item.name.clone(),
                quantity: line.quantity,
                cost,
            });
        }

        // Fases 2 e 3.
        self.commit_quantities(&staged).await?;

        let entry = NewTransaction {
            transaction_type: TransactionType::Export,
            lines: tx_lines,
            total_amount: total,
            note: note.unwrap_or_else(|| "Saída de estoque".to_string()),
            supplier: None,
            order_id,
            created_by,
        };
        self.append_or_rollback(entry, &staged).await
    }

    // Consulta do livro com as referências resolvidas para exibição.
    pub async fn transactions(
        &self,
        filter: TransactionFilter,
    ) -> Result<Vec<TransactionView>, AppError> {
        let entries = self.transaction_repo.query(filter).await?;

        let mut views = Vec::with_capacity(entries.len());
        for entry in entries {
            let created_by_name = match entry.created_by {
                Some(user_id) => self.user_repo.find_by_id(user_id).await?.map(|u| u.name),
                None => None,
            };
            let order_code = match entry.order_id {
                Some(order_id) => self
                    .order_repo
                    .find_by_id(order_id)
                    .await?
                    .map(|o| o.order_code),
                None => None,
            };

            views.push(TransactionView {
                id: entry.id,
                transaction_type: entry.transaction_type,
                lines: entry.lines,
                total_amount: entry.total_amount,
                note: entry.note,
                supplier: entry.supplier,
                order_id: entry.order_id,
                order_code,
                created_by: entry.created_by,
                created_by_name,
                created_at: entry.created_at,
            });
        }
        Ok(views)
    }

    // ---
    // Fases de gravação (chamadas sempre com os locks presos)
    // ---

    // Grava os saldos projetados. Se alguma escrita falhar, restaura os
    // saldos já gravados antes de devolver o erro.
    async fn commit_quantities(&self, staged: &[(InventoryItem, i64)]) -> Result<(), AppError> {
        let mut applied: Vec<(Uuid, i64)> = Vec::with_capacity(staged.len());
        for (item, delta) in staged {
            if let Err(e) = self
                .inventory_repo
                .set_quantity(item.id, item.quantity + delta)
                .await
            {
                self.restore_quantities(&applied).await;
                return Err(e);
            }
            applied.push((item.id, item.quantity));
        }
        Ok(())
    }

    // Grava o lançamento; se o livro recusar, desfaz os saldos para a
    // operação continuar tudo-ou-nada.
    async fn append_or_rollback(
        &self,
        entry: NewTransaction,
        staged: &[(InventoryItem, i64)],
    ) -> Result<Transaction, AppError> {
        match self.transaction_repo.append(entry).await {
            Ok(transaction) => Ok(transaction),
            Err(e) => {
                let applied: Vec<(Uuid, i64)> =
                    staged.iter().map(|(item, _)| (item.id, item.quantity)).collect();
                self.restore_quantities(&applied).await;
                Err(e)
            }
        }
    }

    async fn restore_quantities(&self, applied: &[(Uuid, i64)]) {
        for (id, quantity) in applied.iter().rev() {
            if let Err(e) = self.inventory_repo.set_quantity(*id, *quantity).await {
                tracing::error!("Falha ao restaurar o saldo do item {}: {}", id, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{
        InMemoryInventoryRepository, InMemoryOrderRepository, InMemoryTransactionRepository,
        InMemoryUserRepository,
    };
    use async_trait::async_trait;
    use proptest::prelude::*;

    fn service() -> (InventoryService, Arc<InMemoryInventoryRepository>) {
        let inventory_repo = Arc::new(InMemoryInventoryRepository::new());
        let service = InventoryService::new(
            inventory_repo.clone(),
            Arc::new(InMemoryTransactionRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryOrderRepository::new()),
        );
        (service, inventory_repo)
    }

    async fn seed_item(service: &InventoryService, name: &str, quantity: i64, cost: i64) -> InventoryItem {
        service
            .create_item(CreateItemPayload {
                name: name.to_string(),
                unit: "kg".to_string(),
                quantity,
                cost_per_unit: Decimal::from(cost),
                supplier: None,
                category: None,
                minimum_stock: None,
            })
            .await
            .unwrap()
    }

    fn import_line(item: &InventoryItem, quantity: i64, cost: Option<i64>) -> ImportLine {
        ImportLine {
            item_id: item.id,
            quantity,
            unit_cost: cost.map(Decimal::from),
        }
    }

    fn export_line(item: &InventoryItem, quantity: i64) -> ExportLine {
        ExportLine {
            item_id: item.id,
            quantity,
        }
    }

    #[tokio::test]
    async fn entrada_saida_e_recusa_por_saldo() {
        let (service, _) = service();
        let rice = seed_item(&service, "Arroz", 50, 15_000).await;

        // Entrada de 30 unidades a 15000: saldo 80, total 450000.
        let entry = service
            .apply_import(vec![import_line(&rice, 30, Some(15_000))], None, None, None)
            .await
            .unwrap();
        assert_eq!(entry.total_amount, Decimal::from(450_000));
        assert_eq!(service.get_item(rice.id).await.unwrap().quantity, 80);

        // Saída de 40: saldo 40.
        service
            .apply_export(vec![export_line(&rice, 40)], None, None, None)
            .await
            .unwrap();
        assert_eq!(service.get_item(rice.id).await.unwrap().quantity, 40);

        // Saída de 50: recusada, saldo intacto.
        let err = service
            .apply_export(vec![export_line(&rice, 50)], None, None, None)
            .await
            .unwrap_err();
        match err {
            AppError::InsufficientStock {
                name,
                requested,
                available,
            } => {
                assert_eq!(name, "Arroz");
                assert_eq!(requested, 50);
                assert_eq!(available, 40);
            }
            other => panic!("esperava InsufficientStock, veio {other:?}"),
        }
        assert_eq!(service.get_item(rice.id).await.unwrap().quantity, 40);
    }

    #[tokio::test]
    async fn entrada_usa_custo_do_item_quando_linha_nao_informa() {
        let (service, _) = service();
        let salt = seed_item(&service, "Sal", 10, 2_000).await;

        let entry = service
            .apply_import(vec![import_line(&salt, 5, None)], None, None, None)
            .await
            .unwrap();

        // 5 x 2000 (custo cadastrado do item)
        assert_eq!(entry.lines[0].cost, Decimal::from(10_000));
        assert_eq!(entry.total_amount, Decimal::from(10_000));
    }

    #[tokio::test]
    async fn saida_usa_custo_do_cadastro_como_base() {
        let (service, _) = service();
        let oil = seed_item(&service, "Óleo", 20, 30_000).await;

        let entry = service
            .apply_export(vec![export_line(&oil, 4)], None, None, None)
            .await
            .unwrap();

        assert_eq!(entry.lines[0].cost, Decimal::from(120_000));
        assert_eq!(entry.total_amount, Decimal::from(120_000));
    }

    #[tokio::test]
    async fn entrada_com_item_desconhecido_nao_muta_nada() {
        let (service, _) = service();
        let rice = seed_item(&service, "Arroz", 50, 15_000).await;

        let ghost = ImportLine {
            item_id: Uuid::new_v4(),
            quantity: 10,
            unit_cost: None,
        };
        let err = service
            .apply_import(vec![import_line(&rice, 30, None), ghost], None, None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(service.get_item(rice.id).await.unwrap().quantity, 50);
        assert!(service
            .transactions(TransactionFilter::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn lista_vazia_e_recusada_sem_lancamento() {
        let (service, _) = service();

        let err = service.apply_import(vec![], None, None, None).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));

        let err = service.apply_export(vec![], None, None, None).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn linha_do_livro_guarda_o_nome_da_epoca() {
        let (service, _) = service();
        let fish = seed_item(&service, "Peixe", 10, 40_000).await;

        service
            .apply_import(vec![import_line(&fish, 5, None)], None, None, None)
            .await
            .unwrap();

        // Renomeia o item depois do lançamento.
        service
            .update_item(
                fish.id,
                UpdateItemPayload {
                    name: Some("Peixe fresco".to_string()),
                    unit: None,
                    quantity: None,
                    cost_per_unit: None,
                    supplier: None,
                    category: None,
                    minimum_stock: None,
                },
            )
            .await
            .unwrap();

        let history = service.transactions(TransactionFilter::default()).await.unwrap();
        assert_eq!(history[0].lines[0].name, "Peixe");
    }

    #[tokio::test]
    async fn itens_abaixo_do_minimo_ordenados_por_categoria_e_nome() {
        let (service, _) = service();

        // minimum_stock default = 5; os dois primeiros estão no limite.
        let mut beer = seed_item(&service, "Cerveja", 5, 12_000).await;
        beer = service
            .update_item(
                beer.id,
                UpdateItemPayload {
                    name: None,
                    unit: None,
                    quantity: None,
                    cost_per_unit: None,
                    supplier: None,
                    category: Some(ItemCategory::Beverage),
                    minimum_stock: None,
                },
            )
            .await
            .unwrap();
        let rice = seed_item(&service, "Arroz", 3, 15_000).await;
        seed_item(&service, "Peixe", 100, 40_000).await; // saldo alto, fora da lista

        let low = service.low_stock().await.unwrap();
        let ids: Vec<Uuid> = low.iter().map(|i| i.id).collect();

        // raw-material vem antes de beverage na ordem das categorias.
        assert_eq!(ids, vec![rice.id, beer.id]);
    }

    #[tokio::test]
    async fn saidas_concorrentes_nao_furam_o_saldo() {
        let (service, _) = service();
        let item = seed_item(&service, "Camarão", 1, 80_000).await;

        let s1 = service.clone();
        let s2 = service.clone();
        let line1 = export_line(&item, 1);
        let line2 = export_line(&item, 1);

        let (r1, r2) = tokio::join!(
            tokio::spawn(async move { s1.apply_export(vec![line1], None, None, None).await }),
            tokio::spawn(async move { s2.apply_export(vec![line2], None, None, None).await }),
        );
        let results = [r1.unwrap(), r2.unwrap()];

        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1, "exatamente uma das saídas deve passar");
        assert_eq!(service.get_item(item.id).await.unwrap().quantity, 0);
    }

    // Livro que sempre recusa o append, para exercitar o desfazer.
    struct FailingTransactionRepository;

    #[async_trait]
    impl TransactionRepository for FailingTransactionRepository {
        async fn append(&self, _new_transaction: NewTransaction) -> Result<Transaction, AppError> {
            Err(AppError::InternalServerError(anyhow::anyhow!(
                "livro indisponível"
            )))
        }

        async fn query(&self, _filter: TransactionFilter) -> Result<Vec<Transaction>, AppError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn falha_na_gravacao_do_livro_desfaz_os_saldos() {
        let inventory_repo = Arc::new(InMemoryInventoryRepository::new());
        let service = InventoryService::new(
            inventory_repo.clone(),
            Arc::new(FailingTransactionRepository),
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryOrderRepository::new()),
        );
        let rice = seed_item(&service, "Arroz", 50, 15_000).await;

        let err = service
            .apply_import(vec![import_line(&rice, 30, None)], None, None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InternalServerError(_)));
        assert_eq!(service.get_item(rice.id).await.unwrap().quantity, 50);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 32,
            ..ProptestConfig::default()
        })]

        // Para qualquer sequência de entradas e saídas sobre um item, o
        // saldo final é o inicial + entradas aceitas - saídas aceitas,
        // e nunca fica negativo em nenhum passo.
        #[test]
        fn saldo_acompanha_o_livro(
            initial in 0i64..100,
            ops in prop::collection::vec((any::<bool>(), 1i64..30), 1..20)
        ) {
            let rt = tokio::runtime::Runtime::new().expect("runtime de teste");
            rt.block_on(async {
                let (service, _) = service();
                let item = seed_item(&service, "Arroz", initial, 15_000).await;

                let mut expected = initial;
                for (is_import, quantity) in ops {
                    if is_import {
                        service
                            .apply_import(
                                vec![import_line(&item, quantity, None)],
                                None,
                                None,
                                None,
                            )
                            .await
                            .unwrap();
                        expected += quantity;
                    } else {
                        match service
                            .apply_export(vec![export_line(&item, quantity)], None, None, None)
                            .await
                        {
                            Ok(_) => expected -= quantity,
                            Err(AppError::InsufficientStock { available, .. }) => {
                                assert_eq!(available, expected);
                            }
                            Err(other) => panic!("erro inesperado: {other:?}"),
                        }
                    }

                    let current = service.get_item(item.id).await.unwrap().quantity;
                    assert_eq!(current, expected);
                    assert!(current >= 0);
                }
            });
        }
    }
}
