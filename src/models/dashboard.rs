// src/models/dashboard.rs

use chrono::{DateTime, Duration, Local, LocalResult, Months, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// Atalhos de período aceitos pelos endpoints do dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Today,
    Week,
    Month,
    Custom,
}

impl Period {
    // Valor desconhecido vira None; cada endpoint aplica o seu default.
    pub fn parse(raw: &str) -> Option<Period> {
        match raw {
            "today" => Some(Period::Today),
            "week" => Some(Period::Week),
            "month" => Some(Period::Month),
            "custom" => Some(Period::Custom),
            _ => None,
        }
    }

    // Resolve o atalho para [primeiro dia, último dia] do calendário,
    // relativo a `today`. `Custom` não passa por aqui: os limites vêm
    // explícitos da query.
    pub fn resolve(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Period::Today | Period::Custom => (today, today),
            Period::Week => (today - Duration::days(7), today),
            Period::Month => (
                today
                    .checked_sub_months(Months::new(1))
                    .unwrap_or_else(|| today - Duration::days(30)),
                today,
            ),
        }
    }
}

// Janela de agregação em UTC: [start, end_exclusive).
// `end_exclusive` é o primeiro instante do dia seguinte ao último dia,
// o que equivale a fechar o intervalo em 23:59:59.999.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end_exclusive: DateTime<Utc>,
}

impl DateWindow {
    // Constrói a janela a partir de dias do calendário LOCAL.
    pub fn from_local_days(first: NaiveDate, last: NaiveDate) -> DateWindow {
        let start = local_to_utc(first.and_hms_opt(0, 0, 0).unwrap_or_default());
        let end_exclusive = local_to_utc(
            (last + Duration::days(1))
                .and_hms_opt(0, 0, 0)
                .unwrap_or_default(),
        );
        DateWindow {
            start,
            end_exclusive,
        }
    }

    // Último instante incluído na janela, para exibição nas respostas.
    pub fn end_inclusive(&self) -> DateTime<Utc> {
        self.end_exclusive - Duration::milliseconds(1)
    }
}

// Interpreta um horário "de parede" no fuso local do servidor. Horário
// ambíguo (fim de horário de verão) fica com a primeira ocorrência;
// horário inexistente cai na interpretação UTC.
fn local_to_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    match naive.and_local_timezone(Local) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(first, _) => first.with_timezone(&Utc),
        LocalResult::None => Utc.from_utc_datetime(&naive),
    }
}

// Dia do calendário local em que um instante aconteceu.
pub fn local_date_of(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&Local).date_naive()
}

// ---
// Respostas do dashboard
// ---

// Resumo do dia (os cards do topo do painel).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodayStats {
    pub date: NaiveDate,
    pub total_revenue: Decimal,
    pub order_count: u64,
    pub paid_order_count: u64,
    pub reservation_count: u64,
}

// Um ponto do gráfico de linha (receita por dia).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyRevenue {
    pub date: String, // YYYY-MM-DD
    pub revenue: Decimal,
}

// Receita bruta de um intervalo, SEM filtro de pagamento: o painel de
// vendas conta todo pedido registrado, pago ou não. A definição "só
// pagos" existe separada em ProfitStats e as duas não se misturam.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevenueStats {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_revenue: Decimal,
    pub order_count: u64,
    pub revenue_data: Vec<DailyRevenue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopItemEntry {
    pub item_id: Uuid,
    pub name: String,
    pub quantity_sold: i64,
    pub revenue: Decimal,
}

// Lucro bruto do período: receita (só pedidos pagos) menos custo
// (total gasto em entradas de estoque no mesmo período).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfitStats {
    pub period: Period,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_revenue: Decimal,
    pub total_cost: Decimal,
    pub gross_profit: Decimal,
    pub profit_margin: Decimal,
}
