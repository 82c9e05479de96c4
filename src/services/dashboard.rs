// src/services/dashboard.rs
//
// Agregador do dashboard da loja: compõe livro-razão, metas, comissões,
// ranking semanal e projeção de potencial no envelope que o frontend
// consome. As linhas cruas são buscadas UMA vez e fatiadas em memória por
// janela e por vendedor, então todos os números saem da mesma fonte.

use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        period::{last_day_of_month, month_of, week_of, DateRange},
    },
    db::{GoalRepository, StoreRepository},
    models::{
        dashboard::{
            AppliedPeriod, BestSellerWeek, DashboardResponse, GoalTargetsSummary,
            MetricsByGranularity, MonthlyNetSales, NextSchedule, OrderCounts, SalesMetrics,
            SalesTotals, SellerAnnualRow,
        },
        goal::Goal,
        sales::SaleRow,
        store::{Seller, SellerCounts},
    },
    services::{
        commission::{self, CommissionService},
        goals::{goal_view, progress_percentage},
        ledger::{Ledger, LedgerRows, LedgerService, Scope},
        potential::PotentialService,
        ranking::gross_by_seller,
    },
};

// Horizonte de varredura da "próxima escala": de amanhã até +14 dias
const NEXT_SCHEDULE_HORIZON_DAYS: u64 = 14;

pub fn metrics_from(ledger: &Ledger) -> SalesMetrics {
    SalesMetrics {
        net_sales: ledger.net_sales().round_dp(2),
        ticket_medio: ledger.ticket_medio().round_dp(2),
        pa_produtos_atendimento: ledger.pa_produtos_atendimento().round_dp(2),
    }
}

/// Progresso agregado: vendas líquidas do mês sobre a soma dos alvos das
/// metas ativas. Soma zero devolve 0%, nunca erro.
pub fn goal_targets_summary(goals: &[Goal], month_net: Decimal) -> GoalTargetsSummary {
    let target_total: Decimal = goals.iter().map(|g| g.target_value).sum();
    GoalTargetsSummary {
        target_total,
        current_month_sales: month_net.round_dp(2),
        percentual_atingido: progress_percentage(month_net, target_total).round_dp(2),
    }
}

fn distinct_sale_days(sales: &[SaleRow], seller: Uuid, range: &DateRange) -> i64 {
    let days: HashSet<NaiveDate> = sales
        .iter()
        .filter(|row| row.seller_id == seller && range.contains(row.sold_at))
        .map(|row| row.sold_at)
        .collect();
    days.len() as i64
}

fn best_seller_of_week(
    sellers: &[Seller],
    sales: &[SaleRow],
    week: &DateRange,
) -> Option<BestSellerWeek> {
    let totals = gross_by_seller(sales, week);
    sellers
        .iter()
        .map(|s| (s, totals.get(&s.id).copied().unwrap_or_default()))
        .filter(|(_, total)| *total > Decimal::ZERO)
        .max_by(|a, b| a.1.cmp(&b.1))
        .map(|(seller, total)| BestSellerWeek {
            seller: seller.into(),
            sales: total,
        })
}

#[derive(Clone)]
pub struct DashboardService {
    store_repo: StoreRepository,
    goal_repo: GoalRepository,
    ledger: LedgerService,
    commission: CommissionService,
    potential: PotentialService,
}

impl DashboardService {
    pub fn new(
        store_repo: StoreRepository,
        goal_repo: GoalRepository,
        ledger: LedgerService,
        commission: CommissionService,
        potential: PotentialService,
    ) -> Self {
        Self {
            store_repo,
            goal_repo,
            ledger,
            commission,
            potential,
        }
    }

    pub async fn store_dashboard(
        &self,
        slug: &str,
        period: Option<&str>,
        reference: NaiveDate,
    ) -> Result<DashboardResponse, AppError> {
        let store = self
            .store_repo
            .find_by_slug(slug)
            .await?
            .ok_or(AppError::StoreNotFound)?;

        let all_sellers = self.store_repo.sellers_of_store(store.id).await?;
        let active_sellers: Vec<Seller> = all_sellers
            .iter()
            .filter(|s| s.is_active(reference))
            .cloned()
            .collect();
        let on_vacation = self
            .store_repo
            .sellers_on_vacation(store.id, reference)
            .await?;

        let seller_counts = SellerCounts {
            total: all_sellers.len() as i64,
            active: active_sellers.len() as i64,
            on_vacation: on_vacation.len() as i64,
        };

        // Contagens operacionais
        let shifts = self.store_repo.count_shifts(store.id).await?;
        let schedules = self.store_repo.count_schedules(store.id).await?;
        let absences = self.store_repo.count_absences(store.id).await?;

        let tomorrow = reference
            .checked_add_days(Days::new(1))
            .unwrap_or(reference);
        let horizon = tomorrow
            .checked_add_days(Days::new(NEXT_SCHEDULE_HORIZON_DAYS - 1))
            .unwrap_or(tomorrow);
        let next_schedule = self
            .store_repo
            .next_scheduled_day(store.id, tomorrow, horizon)
            .await?
            .map(|(date, headcount)| NextSchedule { date, headcount });

        // Janelas fixas + a janela pedida via query string
        let window = crate::common::period::resolve_dashboard_window(period, reference);
        let today = DateRange::new(reference, reference);
        let week = week_of(reference);
        let month = month_of(reference);
        let all_time = crate::common::period::resolve_dashboard_window(Some("all-time"), reference);

        // Uma única leitura cobre todas as janelas
        let rows = self
            .ledger
            .fetch_rows(&Scope::Store(store.id), &all_time)
            .await?;

        let ledger_today = rows.ledger(&today);
        let ledger_week = rows.ledger(&week);
        let ledger_month = rows.ledger(&month);
        let ledger_total = rows.ledger(&all_time);

        let sales = SalesTotals {
            today: ledger_today.net_sales().round_dp(2),
            current_week: ledger_week.net_sales().round_dp(2),
            current_month: ledger_month.net_sales().round_dp(2),
            total: ledger_total.net_sales().round_dp(2),
        };
        let order_count = OrderCounts {
            today: ledger_today.order_count,
            current_week: ledger_week.order_count,
            current_month: ledger_month.order_count,
            total: ledger_total.order_count,
        };
        let metrics = MetricsByGranularity {
            today: metrics_from(&ledger_today),
            current_week: metrics_from(&ledger_week),
            current_month: metrics_from(&ledger_month),
            total: metrics_from(&ledger_total),
        };

        // Metas ativas da loja e progresso agregado do mês
        let active_goals = self
            .goal_repo
            .store_goals_active_at(store.id, reference)
            .await?;
        let targets = goal_targets_summary(&active_goals, ledger_month.net_sales());

        // Projeção de potencial (janela própria de 6 meses)
        let (sales_potential, individual_potential) = self
            .potential
            .project_for_store(&store, &active_sellers, reference)
            .await?;

        // Quebra anual por vendedor, na janela pedida
        let sellers_annual_data = self
            .annual_rows(&store.id, &active_sellers, &rows, &window, &individual_potential)
            .await?;
        let top_sellers: Vec<SellerAnnualRow> =
            sellers_annual_data.iter().take(3).cloned().collect();

        // Vendas líquidas mês a mês do ano corrente, sem meses futuros
        let mut monthly_sales = Vec::new();
        for month_number in 1..=reference.month() {
            let month_range = DateRange::new(
                NaiveDate::from_ymd_opt(reference.year(), month_number, 1)
                    .unwrap_or(reference),
                last_day_of_month(reference.year(), month_number),
            );
            monthly_sales.push(MonthlyNetSales {
                month: month_number,
                net_sales: rows.ledger(&month_range).net_sales().round_dp(2),
            });
        }

        let best_seller_week = best_seller_of_week(&active_sellers, &rows.sales, &week);

        let goals = active_goals
            .into_iter()
            .map(|g| goal_view(g, reference))
            .collect();

        Ok(DashboardResponse {
            store,
            sellers: seller_counts,
            shifts,
            schedules,
            absences,
            next_schedule,
            sales,
            order_count,
            metrics,
            targets,
            sales_potential,
            top_sellers,
            sellers_annual_data,
            monthly_sales,
            best_seller_week,
            goals,
            period: AppliedPeriod {
                start_date: window.start,
                end_date: window.end,
            },
        })
    }

    /// Uma linha por vendedor ativo, ordenada decrescente por venda bruta.
    async fn annual_rows(
        &self,
        store_id: &Uuid,
        sellers: &[Seller],
        rows: &LedgerRows,
        window: &DateRange,
        individual_potential: &HashMap<Uuid, Decimal>,
    ) -> Result<Vec<SellerAnnualRow>, AppError> {
        let seller_ids: Vec<Uuid> = sellers.iter().map(|s| s.id).collect();
        let goals = self
            .goal_repo
            .individual_goals_overlapping(&seller_ids, window)
            .await?;
        let levels = self.commission.active_levels(*store_id).await?;
        let adjustments: HashMap<Uuid, Decimal> = self
            .store_repo
            .adjustments_by_seller(*store_id, window.start, window.end)
            .await?
            .into_iter()
            .collect();

        let mut annual: Vec<SellerAnnualRow> = sellers
            .iter()
            .map(|seller| {
                let ledger = rows.ledger_for_seller(seller.id, window);
                let target = goals
                    .iter()
                    .find(|g| g.seller_id == Some(seller.id))
                    .map(|g| g.target_value)
                    .unwrap_or(Decimal::ZERO);
                let percentual = progress_percentage(ledger.gross_sales, target).round_dp(2);

                SellerAnnualRow {
                    seller: seller.into(),
                    sales: ledger.gross_sales,
                    net_sales: ledger.net_sales().round_dp(2),
                    ticket_medio: ledger.ticket_medio().round_dp(2),
                    pa_produtos_atendimento: ledger.pa_produtos_atendimento().round_dp(2),
                    days_worked: distinct_sale_days(&rows.sales, seller.id, window),
                    returns_value: ledger.returned_value.round_dp(2),
                    exchanges_value: (ledger.credit_exchange_value
                        + ledger.debit_exchange_value)
                        .round_dp(2),
                    adjustments_value: adjustments
                        .get(&seller.id)
                        .copied()
                        .unwrap_or_default()
                        .round_dp(2),
                    potential: individual_potential
                        .get(&seller.id)
                        .copied()
                        .unwrap_or_default()
                        .round_dp(2),
                    commission: commission::resolve(&levels, percentual, ledger.gross_sales),
                }
            })
            .collect();

        annual.sort_by(|a, b| b.sales.cmp(&a.sales));
        Ok(annual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn goal(target: Decimal) -> Goal {
        Goal {
            id: Uuid::new_v4(),
            seller_id: None,
            store_id: None,
            goal_type: "sales".to_string(),
            goal_scope: crate::models::goal::GoalScope::StoreWide,
            start_date: date(2026, 8, 1),
            end_date: date(2026, 8, 31),
            target_value: target,
            current_value: Decimal::ZERO,
            created_at: None,
        }
    }

    #[test]
    fn metricas_zeradas_sem_pedidos() {
        let metrics = metrics_from(&Ledger::default());
        assert_eq!(metrics.net_sales, Decimal::ZERO);
        assert_eq!(metrics.ticket_medio, Decimal::ZERO);
        assert_eq!(metrics.pa_produtos_atendimento, Decimal::ZERO);
    }

    #[test]
    fn progresso_agregado_soma_os_alvos_ativos() {
        let goals = vec![goal(dec!(10000)), goal(dec!(10000))];
        let summary = goal_targets_summary(&goals, dec!(11400));

        assert_eq!(summary.target_total, dec!(20000));
        assert_eq!(summary.percentual_atingido, dec!(57.00));
    }

    #[test]
    fn progresso_agregado_sem_metas_e_zero() {
        let summary = goal_targets_summary(&[], dec!(11400));
        assert_eq!(summary.percentual_atingido, Decimal::ZERO);
    }

    #[test]
    fn melhor_da_semana_ignora_quem_nao_vendeu() {
        let a = crate::models::store::Seller {
            id: Uuid::new_v4(),
            store_id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            user_id: None,
            external_id: None,
            name: "A".to_string(),
            email: None,
            phone: None,
            active_until: None,
            is_busy: false,
            queue_order: 0,
            created_at: None,
        };
        let week = DateRange::new(date(2026, 8, 3), date(2026, 8, 9));

        // Ninguém vendeu: não há "melhor da semana"
        assert!(best_seller_of_week(&[a.clone()], &[], &week).is_none());

        let sales = vec![SaleRow {
            seller_id: a.id,
            order_id: Uuid::new_v4(),
            sold_at: date(2026, 8, 5),
            quantity: 1,
            unit_price: dec!(700.00),
        }];
        let best = best_seller_of_week(&[a.clone()], &sales, &week).unwrap();
        assert_eq!(best.seller.id, a.id);
        assert_eq!(best.sales, dec!(700.00));
    }
}
