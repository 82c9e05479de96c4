// src/services/potential.rs
//
// Projeção de "potencial" da loja: a melhor média diária histórica entre os
// vendedores, extrapolada pelos dias de trabalho agendados de cada um no
// mês corrente. Limiares expostos como constantes nomeadas para isolar
// ajustes futuros do algoritmo em si.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::{
    common::{error::AppError, period::{month_of, DateRange}},
    db::StoreRepository,
    models::{
        dashboard::SalesPotential,
        sales::SaleRow,
        store::{Seller, Store},
    },
    services::ledger::{LedgerService, Scope},
};

// Dias distintos de venda exigidos para entrar na disputa de melhor média
pub const MIN_QUALIFYING_SALES_DAYS: i64 = 10;

// Vendas no mês corrente abaixo disso não projetam potencial (evita
// projetar potencial fantasma para vendedores parados)
pub const MATERIALITY_THRESHOLD: Decimal = Decimal::ONE_HUNDRED;

// Vendedor sem escala cadastrada assume a carga padrão do varejo
pub const DEFAULT_WORK_DAYS_PER_MONTH: i64 = 24;

// Janela de análise: 6 meses para trás, a partir do primeiro dia do mês
const ANALYSIS_MONTHS: u32 = 6;

#[derive(Debug, Clone, Default)]
pub struct SellerDailyAverage {
    pub total: Decimal,
    pub distinct_days: i64,
    pub average_per_day: Decimal,
}

/// Total vendido e média por dia de venda (dias DISTINTOS com venda, não
/// dias corridos) por vendedor, dentro da janela.
pub fn daily_averages(sales: &[SaleRow], range: &DateRange) -> HashMap<Uuid, SellerDailyAverage> {
    let mut totals: HashMap<Uuid, (Decimal, HashSet<NaiveDate>)> = HashMap::new();

    for row in sales {
        if !range.contains(row.sold_at) {
            continue;
        }
        let entry = totals.entry(row.seller_id).or_default();
        entry.0 += row.subtotal();
        entry.1.insert(row.sold_at);
    }

    totals
        .into_iter()
        .map(|(seller_id, (total, days))| {
            let distinct_days = days.len() as i64;
            let average_per_day = if distinct_days == 0 {
                Decimal::ZERO
            } else {
                total / Decimal::from(distinct_days)
            };
            (
                seller_id,
                SellerDailyAverage {
                    total,
                    distinct_days,
                    average_per_day,
                },
            )
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct PotentialProjection {
    pub potential: Decimal,
    pub best_seller_average: Decimal,
    pub total_work_days: i64,
    pub best_seller: Option<Uuid>,
    pub individual: HashMap<Uuid, Decimal>,
}

/// Projeta o potencial da loja.
///
/// O benchmark é a melhor média diária entre os vendedores qualificados
/// (mais de `MIN_QUALIFYING_SALES_DAYS` dias distintos de venda; sem
/// nenhum qualificado, todos entram). O potencial individual é o benchmark
/// vezes os dias agendados do vendedor no mês; o da loja soma apenas os
/// vendedores com venda material no mês corrente. O piso garante que o
/// potencial nunca fique abaixo do já realizado.
pub fn project_potential(
    sellers: &[Seller],
    averages: &HashMap<Uuid, SellerDailyAverage>,
    scheduled_days: &HashMap<Uuid, i64>,
    month_sales: &HashMap<Uuid, Decimal>,
    month_actual_net: Decimal,
) -> PotentialProjection {
    let empty = SellerDailyAverage::default();

    let qualifying: Vec<&Seller> = sellers
        .iter()
        .filter(|s| {
            averages.get(&s.id).unwrap_or(&empty).distinct_days > MIN_QUALIFYING_SALES_DAYS
        })
        .collect();
    let candidates: Vec<&Seller> = if qualifying.is_empty() {
        sellers.iter().collect()
    } else {
        qualifying
    };

    let mut best_seller: Option<Uuid> = None;
    let mut best_average = Decimal::ZERO;
    for candidate in &candidates {
        let average = averages
            .get(&candidate.id)
            .unwrap_or(&empty)
            .average_per_day;
        if average > best_average {
            best_average = average;
            best_seller = Some(candidate.id);
        }
    }

    let mut individual = HashMap::new();
    let mut total_work_days = 0;
    let mut computed = Decimal::ZERO;

    for seller in sellers {
        let work_days = scheduled_days
            .get(&seller.id)
            .copied()
            .unwrap_or(DEFAULT_WORK_DAYS_PER_MONTH);
        total_work_days += work_days;

        let seller_potential = best_average * Decimal::from(work_days);
        individual.insert(seller.id, seller_potential);

        let month_total = month_sales.get(&seller.id).copied().unwrap_or_default();
        if month_total > MATERIALITY_THRESHOLD {
            computed += seller_potential;
        }
    }

    PotentialProjection {
        // O potencial nunca é reportado abaixo do que já foi realizado
        potential: computed.max(month_actual_net),
        best_seller_average: best_average,
        total_work_days,
        best_seller,
        individual,
    }
}

#[derive(Clone)]
pub struct PotentialService {
    store_repo: StoreRepository,
    ledger: LedgerService,
}

impl PotentialService {
    pub fn new(store_repo: StoreRepository, ledger: LedgerService) -> Self {
        Self { store_repo, ledger }
    }

    /// Janela de análise: do primeiro dia do mês, 6 meses atrás, até a
    /// data de referência.
    pub fn analysis_window(reference: NaiveDate) -> DateRange {
        let start = reference
            .checked_sub_months(Months::new(ANALYSIS_MONTHS))
            .map(|d| month_of(d).start)
            .unwrap_or(reference);
        DateRange::new(start, reference)
    }

    pub async fn project_for_store(
        &self,
        store: &Store,
        sellers: &[Seller],
        reference: NaiveDate,
    ) -> Result<(SalesPotential, HashMap<Uuid, Decimal>), AppError> {
        let window = Self::analysis_window(reference);
        let month_window = month_of(reference);

        let rows = self
            .ledger
            .fetch_rows(&Scope::Store(store.id), &window)
            .await?;

        let averages = daily_averages(&rows.sales, &window);
        let month_sales = super::ranking::gross_by_seller(&rows.sales, &month_window);
        let month_actual_net = rows.ledger(&month_window).net_sales();

        let scheduled_days: HashMap<Uuid, i64> = self
            .store_repo
            .scheduled_days_by_seller(store.id, month_window.start, month_window.end)
            .await?
            .into_iter()
            .collect();

        let projection = project_potential(
            sellers,
            &averages,
            &scheduled_days,
            &month_sales,
            month_actual_net,
        );

        let best_seller = projection
            .best_seller
            .and_then(|id| sellers.iter().find(|s| s.id == id))
            .map(Into::into);

        let wire = SalesPotential {
            potential: projection.potential.round_dp(2),
            best_seller_average: projection.best_seller_average.round_dp(2),
            total_work_days: projection.total_work_days,
            best_seller,
        };

        Ok((wire, projection.individual))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seller(name: &str) -> Seller {
        Seller {
            id: Uuid::new_v4(),
            store_id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            user_id: None,
            external_id: None,
            name: name.to_string(),
            email: None,
            phone: None,
            active_until: None,
            is_busy: false,
            queue_order: 0,
            created_at: None,
        }
    }

    fn sales_on_days(seller_id: Uuid, days: &[NaiveDate], value: Decimal) -> Vec<SaleRow> {
        days.iter()
            .map(|day| SaleRow {
                seller_id,
                order_id: Uuid::new_v4(),
                sold_at: *day,
                quantity: 1,
                unit_price: value,
            })
            .collect()
    }

    fn consecutive_days(start: NaiveDate, count: u64) -> Vec<NaiveDate> {
        (0..count)
            .map(|i| start.checked_add_days(chrono::Days::new(i)).unwrap())
            .collect()
    }

    #[test]
    fn media_por_dias_distintos_de_venda() {
        let a = seller("A");
        let range = DateRange::new(date(2026, 2, 1), date(2026, 8, 6));

        // Duas vendas no mesmo dia contam um dia só
        let day = date(2026, 5, 10);
        let mut sales = sales_on_days(a.id, &[day], dec!(300.00));
        sales.extend(sales_on_days(a.id, &[day], dec!(100.00)));
        sales.extend(sales_on_days(a.id, &[date(2026, 5, 11)], dec!(200.00)));

        let averages = daily_averages(&sales, &range);
        let stats = averages.get(&a.id).unwrap();

        assert_eq!(stats.distinct_days, 2);
        assert_eq!(stats.total, dec!(600.00));
        assert_eq!(stats.average_per_day, dec!(300.00));
    }

    #[test]
    fn vendedor_com_poucos_dias_fica_fora_do_benchmark() {
        // A tem 3 dias (média altíssima), B tem 12 dias: B é o benchmark
        let a = seller("A");
        let b = seller("B");
        let range = DateRange::new(date(2026, 2, 1), date(2026, 8, 6));

        let mut sales = sales_on_days(a.id, &consecutive_days(date(2026, 5, 1), 3), dec!(9000.00));
        sales.extend(sales_on_days(b.id, &consecutive_days(date(2026, 5, 1), 12), dec!(500.00)));

        let averages = daily_averages(&sales, &range);
        let projection = project_potential(
            &[a.clone(), b.clone()],
            &averages,
            &HashMap::new(),
            &HashMap::new(),
            Decimal::ZERO,
        );

        assert_eq!(projection.best_seller, Some(b.id));
        assert_eq!(projection.best_seller_average, dec!(500.00));
    }

    #[test]
    fn sem_qualificados_todos_entram_na_disputa() {
        let a = seller("A");
        let b = seller("B");
        let range = DateRange::new(date(2026, 2, 1), date(2026, 8, 6));

        let mut sales = sales_on_days(a.id, &consecutive_days(date(2026, 5, 1), 3), dec!(900.00));
        sales.extend(sales_on_days(b.id, &consecutive_days(date(2026, 5, 1), 2), dec!(400.00)));

        let averages = daily_averages(&sales, &range);
        let projection = project_potential(
            &[a.clone(), b.clone()],
            &averages,
            &HashMap::new(),
            &HashMap::new(),
            Decimal::ZERO,
        );

        assert_eq!(projection.best_seller, Some(a.id));
    }

    #[test]
    fn potencial_individual_usa_dias_agendados_ou_padrao() {
        let a = seller("A");
        let b = seller("B");
        let range = DateRange::new(date(2026, 2, 1), date(2026, 8, 6));

        let sales = sales_on_days(a.id, &consecutive_days(date(2026, 5, 1), 12), dec!(1000.00));
        let averages = daily_averages(&sales, &range);

        let mut scheduled = HashMap::new();
        scheduled.insert(a.id, 20_i64);
        // B não tem escala: assume os 24 dias padrão

        let projection = project_potential(
            &[a.clone(), b.clone()],
            &averages,
            &scheduled,
            &HashMap::new(),
            Decimal::ZERO,
        );

        assert_eq!(projection.individual.get(&a.id).unwrap(), &dec!(20000.00));
        assert_eq!(projection.individual.get(&b.id).unwrap(), &dec!(24000.00));
        assert_eq!(projection.total_work_days, 44);
    }

    #[test]
    fn so_vendedor_com_venda_material_soma_no_potencial_da_loja() {
        let a = seller("A");
        let b = seller("B");
        let range = DateRange::new(date(2026, 2, 1), date(2026, 8, 6));

        let sales = sales_on_days(a.id, &consecutive_days(date(2026, 5, 1), 12), dec!(1000.00));
        let averages = daily_averages(&sales, &range);

        let mut month_sales = HashMap::new();
        month_sales.insert(a.id, dec!(5000.00));
        month_sales.insert(b.id, dec!(50.00)); // abaixo do limiar de 100

        let projection = project_potential(
            &[a.clone(), b.clone()],
            &averages,
            &HashMap::new(),
            &month_sales,
            Decimal::ZERO,
        );

        // Só o potencial de A (1000 × 24) entra na soma da loja
        assert_eq!(projection.potential, dec!(24000.00));
    }

    #[test]
    fn potencial_nunca_fica_abaixo_do_realizado() {
        let a = seller("A");
        let range = DateRange::new(date(2026, 2, 1), date(2026, 8, 6));

        let sales = sales_on_days(a.id, &consecutive_days(date(2026, 5, 1), 12), dec!(100.00));
        let averages = daily_averages(&sales, &range);

        let mut month_sales = HashMap::new();
        month_sales.insert(a.id, dec!(50000.00));

        let projection = project_potential(
            &[a.clone()],
            &averages,
            &HashMap::new(),
            &month_sales,
            dec!(50000.00),
        );

        // Projeção calculada (100 × 24 = 2400) perde para o realizado
        assert_eq!(projection.potential, dec!(50000.00));
    }
}
