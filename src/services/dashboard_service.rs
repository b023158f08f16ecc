// src/services/dashboard_service.rs

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{OrderRepository, ReservationRepository, TransactionRepository},
    models::{
        dashboard::{
            local_date_of, DailyRevenue, DateWindow, Period, ProfitStats, RevenueStats,
            TodayStats, TopItemEntry,
        },
        inventory::{TransactionFilter, TransactionType},
        order::PaymentStatus,
    },
};

// Agregadores do painel. Tudo aqui é leitura pura: nenhum lock de
// estoque, nenhuma mutação; uma escrita concorrente pode ou não
// aparecer numa consulta em andamento, e isso é aceitável.
#[derive(Clone)]
pub struct DashboardService {
    order_repo: Arc<dyn OrderRepository>,
    reservation_repo: Arc<dyn ReservationRepository>,
    transaction_repo: Arc<dyn TransactionRepository>,
}

impl DashboardService {
    pub fn new(
        order_repo: Arc<dyn OrderRepository>,
        reservation_repo: Arc<dyn ReservationRepository>,
        transaction_repo: Arc<dyn TransactionRepository>,
    ) -> Self {
        Self {
            order_repo,
            reservation_repo,
            transaction_repo,
        }
    }

    // Resumo do dia: pedidos de hoje (pagos ou não), quantos já foram
    // pagos e quantas mesas estão reservadas para hoje.
    pub async fn today_stats(&self) -> Result<TodayStats, AppError> {
        let today = Local::now().date_naive();
        let window = DateWindow::from_local_days(today, today);

        let orders = self
            .order_repo
            .find_in_range(window.start, window.end_exclusive)
            .await?;

        let mut total_revenue = Decimal::ZERO;
        let mut paid_order_count = 0u64;
        for order in &orders {
            total_revenue += order.total_amount;
            if order.payment_status == PaymentStatus::Paid {
                paid_order_count += 1;
            }
        }

        let reservation_count = self.reservation_repo.find_on_date(today).await?.len() as u64;

        Ok(TodayStats {
            date: today,
            total_revenue,
            order_count: orders.len() as u64,
            paid_order_count,
            reservation_count,
        })
    }

    // Receita de um intervalo, SEM filtro de status de pagamento.
    // O painel de vendas conta tudo que foi pedido; a visão "só pagos"
    // fica em `profit_stats` e as duas não devem ser unificadas.
    pub async fn revenue_stats(
        &self,
        period: Option<Period>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<RevenueStats, AppError> {
        let today = Local::now().date_naive();

        let (first, last) = match period.unwrap_or(Period::Week) {
            Period::Custom => match (start, end) {
                (Some(first), Some(last)) => {
                    if first > last {
                        return Err(AppError::InvalidInput(
                            "O início do intervalo não pode vir depois do fim.".to_string(),
                        ));
                    }
                    (first, last)
                }
                // "custom" sem os dois limites cai no padrão de 7 dias.
                _ => Period::Week.resolve(today),
            },
            preset => preset.resolve(today),
        };

        let window = DateWindow::from_local_days(first, last);
        let orders = self
            .order_repo
            .find_in_range(window.start, window.end_exclusive)
            .await?;

        let mut total_revenue = Decimal::ZERO;
        let mut by_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
        for order in &orders {
            total_revenue += order.total_amount;
            *by_day
                .entry(local_date_of(order.created_at))
                .or_insert(Decimal::ZERO) += order.total_amount;
        }

        // O BTreeMap já entrega os dias em ordem crescente.
        let revenue_data = by_day
            .into_iter()
            .map(|(date, revenue)| DailyRevenue {
                date: date.format("%Y-%m-%d").to_string(),
                revenue,
            })
            .collect();

        Ok(RevenueStats {
            start_date: window.start,
            end_date: window.end_inclusive(),
            total_revenue,
            order_count: orders.len() as u64,
            revenue_data,
        })
    }

    // Ranking dos pratos mais vendidos no período, por quantidade.
    // Empate mantém a ordem de chegada (sort estável sobre a ordem de
    // primeira aparição). Sem período, considera o histórico inteiro.
    pub async fn top_items(
        &self,
        period: Option<Period>,
        limit: usize,
    ) -> Result<Vec<TopItemEntry>, AppError> {
        if limit == 0 {
            return Err(AppError::InvalidInput(
                "O limite deve ser maior que zero.".to_string(),
            ));
        }

        let today = Local::now().date_naive();
        let orders = match period {
            Some(preset @ (Period::Today | Period::Week | Period::Month)) => {
                let (first, last) = preset.resolve(today);
                let window = DateWindow::from_local_days(first, last);
                self.order_repo
                    .find_in_range(window.start, window.end_exclusive)
                    .await?
            }
            _ => self.order_repo.list_all().await?,
        };

        let mut index: HashMap<Uuid, usize> = HashMap::new();
        let mut ranking: Vec<TopItemEntry> = Vec::new();

        for order in &orders {
            for line in &order.items {
                let idx = *index.entry(line.menu_item_id).or_insert_with(|| {
                    ranking.push(TopItemEntry {
                        item_id: line.menu_item_id,
                        name: line.name.clone(),
                        quantity_sold: 0,
                        revenue: Decimal::ZERO,
                    });
                    ranking.len() - 1
                });
                let entry = &mut ranking[idx];
                entry.quantity_sold += line.quantity;
                entry.revenue += line.price * Decimal::from(line.quantity);
            }
        }

        ranking.sort_by(|a, b| b.quantity_sold.cmp(&a.quantity_sold));
        ranking.truncate(limit);
        Ok(ranking)
    }

    // Lucro bruto do período: receita SÓ de pedidos pagos, menos o
    // total gasto em entradas de estoque no mesmo intervalo. O custo é
    // o dinheiro que saiu para repor estoque, não o custo do que foi
    // consumido.
    pub async fn profit_stats(&self, period: Option<Period>) -> Result<ProfitStats, AppError> {
        // Aqui o default é "hoje"; "custom" não existe para lucro.
        let preset = match period {
            Some(preset @ (Period::Week | Period::Month)) => preset,
            _ => Period::Today,
        };

        let today = Local::now().date_naive();
        let (first, last) = preset.resolve(today);
        let window = DateWindow::from_local_days(first, last);

        let orders = self
            .order_repo
            .find_in_range(window.start, window.end_exclusive)
            .await?;
        let total_revenue: Decimal = orders
            .iter()
            .filter(|o| o.payment_status == PaymentStatus::Paid)
            .map(|o| o.total_amount)
            .sum();

        let imports = self
            .transaction_repo
            .query(TransactionFilter {
                transaction_type: Some(TransactionType::Import),
                date_range: Some((window.start, window.end_exclusive)),
                order_id: None,
            })
            .await?;
        let total_cost: Decimal = imports.iter().map(|t| t.total_amount).sum();

        let gross_profit = total_revenue - total_cost;
        // Divisão por zero vigiada: sem receita, margem é 0.
        let profit_margin = if total_revenue > Decimal::ZERO {
            gross_profit / total_revenue * Decimal::from(100)
        } else {
            Decimal::ZERO
        };

        Ok(ProfitStats {
            period: preset,
            start_date: window.start,
            end_date: window.end_inclusive(),
            total_revenue,
            total_cost,
            gross_profit,
            profit_margin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{
        InMemoryOrderRepository, InMemoryReservationRepository, InMemoryTransactionRepository,
        OrderRepository, ReservationRepository, TransactionRepository,
    };
    use crate::models::{
        inventory::{NewTransaction, TransactionLine},
        order::{Order, OrderItem, OrderStatus, PaymentMethod},
        reservation::{Reservation, ReservationStatus},
    };
    use chrono::{DateTime, Duration, Utc};

    struct Fixture {
        service: DashboardService,
        orders: Arc<InMemoryOrderRepository>,
        reservations: Arc<InMemoryReservationRepository>,
        transactions: Arc<InMemoryTransactionRepository>,
    }

    fn fixture() -> Fixture {
        let orders = Arc::new(InMemoryOrderRepository::new());
        let reservations = Arc::new(InMemoryReservationRepository::new());
        let transactions = Arc::new(InMemoryTransactionRepository::new());
        let service = DashboardService::new(
            orders.clone(),
            reservations.clone(),
            transactions.clone(),
        );
        Fixture {
            service,
            orders,
            reservations,
            transactions,
        }
    }

    fn item_line(menu_item_id: Uuid, name: &str, price: i64, quantity: i64) -> OrderItem {
        OrderItem {
            menu_item_id,
            name: name.to_string(),
            price: Decimal::from(price),
            quantity,
            note: String::new(),
        }
    }

    fn order(
        total: i64,
        paid: bool,
        created_at: DateTime<Utc>,
        items: Vec<OrderItem>,
    ) -> Order {
        Order {
            id: Uuid::new_v4(),
            order_code: format!("20250518-{}", Uuid::new_v4().as_u128() % 900_000 + 100_000),
            customer_id: None,
            customer_name: "Cliente".to_string(),
            phone: "0901234567".to_string(),
            email: None,
            items,
            reservation_id: None,
            total_amount: Decimal::from(total),
            status: OrderStatus::Pending,
            payment_status: if paid {
                PaymentStatus::Paid
            } else {
                PaymentStatus::Unpaid
            },
            payment_method: PaymentMethod::Cash,
            serve_time: None,
            note: None,
            created_at,
            updated_at: created_at,
        }
    }

    // Um instante ao meio-dia local do dia pedido, em UTC.
    fn noon_of(date: NaiveDate) -> DateTime<Utc> {
        DateWindow::from_local_days(date, date).start + Duration::hours(12)
    }

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn receita_do_intervalo_ignora_status_de_pagamento() {
        let fx = fixture();

        // Dois pedidos dentro do intervalo (um não pago!), um fora.
        fx.orders
            .insert(order(500_000, true, noon_of(day("2025-05-02")), vec![]))
            .await
            .unwrap();
        fx.orders
            .insert(order(300_000, false, noon_of(day("2025-05-06")), vec![]))
            .await
            .unwrap();
        fx.orders
            .insert(order(200_000, true, noon_of(day("2025-04-20")), vec![]))
            .await
            .unwrap();

        let stats = fx
            .service
            .revenue_stats(
                Some(Period::Custom),
                Some(day("2025-05-01")),
                Some(day("2025-05-07")),
            )
            .await
            .unwrap();

        assert_eq!(stats.total_revenue, Decimal::from(800_000));
        assert_eq!(stats.order_count, 2);

        // Quebra por dia em ordem crescente.
        assert_eq!(stats.revenue_data.len(), 2);
        assert_eq!(stats.revenue_data[0].date, "2025-05-02");
        assert_eq!(stats.revenue_data[0].revenue, Decimal::from(500_000));
        assert_eq!(stats.revenue_data[1].date, "2025-05-06");
        assert_eq!(stats.revenue_data[1].revenue, Decimal::from(300_000));
    }

    #[tokio::test]
    async fn intervalo_invertido_e_recusado() {
        let fx = fixture();

        let err = fx
            .service
            .revenue_stats(
                Some(Period::Custom),
                Some(day("2025-05-07")),
                Some(day("2025-05-01")),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn intervalo_sem_pedidos_zera_as_estatisticas() {
        let fx = fixture();

        let stats = fx
            .service
            .revenue_stats(
                Some(Period::Custom),
                Some(day("2024-01-01")),
                Some(day("2024-01-07")),
            )
            .await
            .unwrap();

        assert_eq!(stats.total_revenue, Decimal::ZERO);
        assert_eq!(stats.order_count, 0);
        assert!(stats.revenue_data.is_empty());
    }

    #[tokio::test]
    async fn ranking_acumula_quantidade_e_receita_por_prato() {
        let fx = fixture();
        let item_x = Uuid::new_v4();

        let now = Utc::now();
        fx.orders
            .insert(order(
                20_000,
                true,
                now,
                vec![item_line(item_x, "Cá kho tộ", 10_000, 2)],
            ))
            .await
            .unwrap();
        fx.orders
            .insert(order(
                30_000,
                false,
                now,
                vec![item_line(item_x, "Cá kho tộ", 10_000, 3)],
            ))
            .await
            .unwrap();

        let top = fx.service.top_items(Some(Period::Week), 5).await.unwrap();

        assert_eq!(top.len(), 1);
        assert_eq!(top[0].item_id, item_x);
        assert_eq!(top[0].quantity_sold, 5);
        assert_eq!(top[0].revenue, Decimal::from(50_000));
    }

    #[tokio::test]
    async fn ranking_limita_e_desempata_pela_ordem_de_chegada() {
        let fx = fixture();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let third = Uuid::new_v4();

        let now = Utc::now();
        fx.orders
            .insert(order(
                0,
                true,
                now,
                vec![
                    item_line(first, "Gỏi cuốn", 5_000, 2),
                    item_line(second, "Chè", 4_000, 2),
                    item_line(third, "Trà đá", 2_000, 7),
                ],
            ))
            .await
            .unwrap();

        let top = fx.service.top_items(None, 2).await.unwrap();

        // O limite corta a lista; o empate 2x2 mantém "Gỏi cuốn" antes.
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].item_id, third);
        assert_eq!(top[1].item_id, first);

        // Limite maior que o número de pratos distintos não quebra.
        let all = fx.service.top_items(None, 50).await.unwrap();
        assert_eq!(all.len(), 3);

        let err = fx.service.top_items(None, 0).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn lucro_conta_so_pedidos_pagos_e_desconta_entradas() {
        let fx = fixture();
        let now = Utc::now();

        fx.orders
            .insert(order(500_000, true, now, vec![]))
            .await
            .unwrap();
        // Não pago: entra na receita do painel, mas NÃO no lucro.
        fx.orders
            .insert(order(300_000, false, now, vec![]))
            .await
            .unwrap();

        fx.transactions
            .append(NewTransaction {
                transaction_type: TransactionType::Import,
                lines: vec![TransactionLine {
                    item_id: Uuid::new_v4(),
                    name: "Arroz".to_string(),
                    quantity: 10,
                    cost: Decimal::from(100_000),
                }],
                total_amount: Decimal::from(100_000),
                note: "Entrada de estoque".to_string(),
                supplier: None,
                order_id: None,
                created_by: None,
            })
            .await
            .unwrap();

        let profit = fx.service.profit_stats(None).await.unwrap();

        assert_eq!(profit.period, Period::Today);
        assert_eq!(profit.total_revenue, Decimal::from(500_000));
        assert_eq!(profit.total_cost, Decimal::from(100_000));
        assert_eq!(profit.gross_profit, Decimal::from(400_000));
        assert_eq!(profit.profit_margin, Decimal::from(80));
    }

    #[tokio::test]
    async fn lucro_sem_receita_tem_margem_zero() {
        let fx = fixture();

        fx.transactions
            .append(NewTransaction {
                transaction_type: TransactionType::Import,
                lines: vec![TransactionLine {
                    item_id: Uuid::new_v4(),
                    name: "Arroz".to_string(),
                    quantity: 1,
                    cost: Decimal::from(50_000),
                }],
                total_amount: Decimal::from(50_000),
                note: "Entrada de estoque".to_string(),
                supplier: None,
                order_id: None,
                created_by: None,
            })
            .await
            .unwrap();

        let profit = fx.service.profit_stats(Some(Period::Week)).await.unwrap();

        assert_eq!(profit.total_revenue, Decimal::ZERO);
        assert_eq!(profit.gross_profit, Decimal::from(-50_000));
        assert_eq!(profit.profit_margin, Decimal::ZERO);
    }

    #[tokio::test]
    async fn resumo_de_hoje_conta_pedidos_pagamentos_e_reservas() {
        let fx = fixture();
        let now = Utc::now();
        let today = Local::now().date_naive();

        fx.orders
            .insert(order(100_000, true, now, vec![]))
            .await
            .unwrap();
        fx.orders
            .insert(order(50_000, false, now, vec![]))
            .await
            .unwrap();

        fx.reservations
            .insert(Reservation {
                id: Uuid::new_v4(),
                customer_name: "Cliente".to_string(),
                phone: "0901234567".to_string(),
                email: None,
                date: today,
                time: "19:30".to_string(),
                people: 4,
                special_requests: String::new(),
                status: ReservationStatus::Confirmed,
                table: "5".to_string(),
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        let stats = fx.service.today_stats().await.unwrap();

        assert_eq!(stats.date, today);
        assert_eq!(stats.total_revenue, Decimal::from(150_000));
        assert_eq!(stats.order_count, 2);
        assert_eq!(stats.paid_order_count, 1);
        assert_eq!(stats.reservation_count, 1);
    }

    #[test]
    fn atalhos_de_periodo_resolvem_relativos_a_hoje() {
        let today = day("2025-05-18");

        assert_eq!(Period::Today.resolve(today), (today, today));
        assert_eq!(Period::Week.resolve(today), (day("2025-05-11"), today));
        assert_eq!(Period::Month.resolve(today), (day("2025-04-18"), today));
    }
}
