// src/services/goals.rs
//
// Motor de metas. O estado (ativa/completa/vencida) é DERIVADO — booleanos
// independentes, não uma máquina de transições: uma meta pode estar ativa e
// completa ao mesmo tempo. O cache `current_value` é recalculado por
// re-soma integral da janela, nunca por delta incremental; rodar duas vezes
// sem mudança de dados produz o mesmo valor.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, period::DateRange},
    db::{GoalRepository, StoreRepository},
    models::{
        goal::{CreateGoalPayload, Goal, GoalScope, GoalView, UpdateGoalPayload},
        kpi::{GoalKpis, GoalKpisBeta, MonthKpis, SellerKpisBetaResponse, SellerKpisResponse},
        store::SellerRef,
    },
    services::{
        commission::{self, CommissionService},
        ledger::{LedgerService, Scope},
    },
};

// A "super meta" é 120% da meta
const STRETCH_MULTIPLIER: Decimal = Decimal::from_parts(12, 0, 0, false, 1);

// --- Predicados e métricas derivadas (funções puras) ---

pub fn is_completed(goal: &Goal) -> bool {
    goal.current_value >= goal.target_value
}

pub fn is_overdue(goal: &Goal, reference: NaiveDate) -> bool {
    goal.end_date < reference && !is_completed(goal)
}

/// `current / target × 100`, sem teto (110% é 110%, não 100%).
/// Denominador zero devolve 0, nunca erro.
pub fn progress_percentage(current: Decimal, target: Decimal) -> Decimal {
    if target == Decimal::ZERO {
        return Decimal::ZERO;
    }
    current / target * Decimal::ONE_HUNDRED
}

/// Classificação do período pelo tamanho inclusivo da janela em dias.
/// Só rotula; a matemática é a mesma para todas.
pub fn classify_period(days: i64) -> &'static str {
    match days {
        1..=7 => "daily",
        8..=14 => "weekly",
        15..=35 => "monthly",
        36..=100 => "quarterly",
        _ => "custom",
    }
}

pub fn days_total(goal: &Goal) -> i64 {
    (goal.end_date - goal.start_date).num_days() + 1
}

pub fn days_elapsed(goal: &Goal, reference: NaiveDate) -> i64 {
    ((reference - goal.start_date).num_days() + 1).max(0)
}

pub fn days_remaining(goal: &Goal, reference: NaiveDate) -> i64 {
    (goal.end_date - reference).num_days().max(0)
}

/// Quanto precisa vender por dia, daqui pra frente, para fechar a meta.
pub fn recalculated_daily_target(goal: &Goal, reference: NaiveDate) -> Decimal {
    let remaining = days_remaining(goal, reference);
    if remaining == 0 {
        return Decimal::ZERO;
    }
    (goal.target_value - goal.current_value) / Decimal::from(remaining)
}

/// Distância até a super meta (120% do alvo); nunca negativa.
pub fn stretch_gap(goal: &Goal) -> Decimal {
    (goal.target_value * STRETCH_MULTIPLIER - goal.current_value).max(Decimal::ZERO)
}

pub fn goal_view(goal: Goal, reference: NaiveDate) -> GoalView {
    let percentual = progress_percentage(goal.current_value, goal.target_value).round_dp(2);
    let completed = is_completed(&goal);
    let overdue = is_overdue(&goal, reference);
    let remaining = days_remaining(&goal, reference);
    let period = classify_period(days_total(&goal)).to_string();

    GoalView {
        goal,
        percentual_atingido: percentual,
        completed,
        overdue,
        days_remaining: remaining,
        period,
    }
}

// --- Serviço ---

#[derive(Clone)]
pub struct GoalService {
    repo: GoalRepository,
    store_repo: StoreRepository,
    ledger: LedgerService,
    commission: CommissionService,
}

impl GoalService {
    pub fn new(
        repo: GoalRepository,
        store_repo: StoreRepository,
        ledger: LedgerService,
        commission: CommissionService,
    ) -> Self {
        Self {
            repo,
            store_repo,
            ledger,
            commission,
        }
    }

    // --- CRUD ---

    pub async fn create(
        &self,
        payload: CreateGoalPayload,
        reference: NaiveDate,
    ) -> Result<GoalView, AppError> {
        payload.validate()?;
        if payload.end_date <= payload.start_date {
            return Err(AppError::InvalidDateRange);
        }
        if payload.goal_scope == GoalScope::Individual && payload.seller_id.is_none() {
            return Err(AppError::GoalScopeMismatch);
        }

        let goal = self.repo.create(&payload).await?;
        // Recomputa o cache já na criação (ansioso, não preguiçoso)
        let current = self.refresh_goal_progress(&goal, reference).await?;

        Ok(goal_view(Goal { current_value: current, ..goal }, reference))
    }

    pub async fn get(&self, id: Uuid, reference: NaiveDate) -> Result<GoalView, AppError> {
        let goal = self.repo.find(id).await?.ok_or(AppError::GoalNotFound)?;
        Ok(goal_view(goal, reference))
    }

    pub async fn list(&self, reference: NaiveDate) -> Result<Vec<GoalView>, AppError> {
        let goals = self.repo.list().await?;
        Ok(goals.into_iter().map(|g| goal_view(g, reference)).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: UpdateGoalPayload,
        reference: NaiveDate,
    ) -> Result<GoalView, AppError> {
        payload.validate()?;
        let existing = self.repo.find(id).await?.ok_or(AppError::GoalNotFound)?;

        let start_date = payload.start_date.unwrap_or(existing.start_date);
        let end_date = payload.end_date.unwrap_or(existing.end_date);
        let target_value = payload.target_value.unwrap_or(existing.target_value);
        if end_date <= start_date {
            return Err(AppError::InvalidDateRange);
        }

        let goal = self.repo.update(id, start_date, end_date, target_value).await?;
        let current = self.refresh_goal_progress(&goal, reference).await?;

        Ok(goal_view(Goal { current_value: current, ..goal }, reference))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::GoalNotFound);
        }
        Ok(())
    }

    // --- Recalculo do cache ---

    /// Re-soma as vendas líquidas da janela da meta e grava o cache.
    /// Operação nomeada e idempotente: efeito colateral do caminho de
    /// escrita de pedidos E endpoint de recálculo sob demanda.
    pub async fn refresh_goal_progress(
        &self,
        goal: &Goal,
        _reference: NaiveDate,
    ) -> Result<Decimal, AppError> {
        let scope = self.scope_for(goal).await?;
        let range = DateRange::new(goal.start_date, goal.end_date);
        let net = self.ledger.net_sales(&scope, &range).await?;

        // O cache nunca fica negativo, mesmo num período pesado de devoluções
        let value = net.max(Decimal::ZERO);
        self.repo.update_current_value(goal.id, value).await?;

        Ok(value)
    }

    /// Recalcula toda meta cuja janela contém a data de referência.
    pub async fn refresh_goals_for_date(&self, reference: NaiveDate) -> Result<usize, AppError> {
        let goals = self.repo.active_at(reference).await?;
        for goal in &goals {
            self.refresh_goal_progress(goal, reference).await?;
        }
        Ok(goals.len())
    }

    /// Resolve o escopo de recálculo da meta:
    /// 1. vendedor + escopo individual  -> o próprio vendedor;
    /// 2. vendedor + escopo store_wide  -> a loja do vendedor;
    /// 3. sem vendedor                  -> a loja vinculada, ou global.
    async fn scope_for(&self, goal: &Goal) -> Result<Scope, AppError> {
        match (goal.seller_id, goal.goal_scope) {
            (Some(seller_id), GoalScope::Individual) => Ok(Scope::Seller(seller_id)),
            (Some(seller_id), GoalScope::StoreWide) => {
                if let Some(store_id) = goal.store_id {
                    return Ok(Scope::Store(store_id));
                }
                let store_id = self
                    .repo
                    .store_of_seller(seller_id)
                    .await?
                    .ok_or(AppError::SellerNotFound)?;
                Ok(Scope::Store(store_id))
            }
            (None, _) => Ok(goal.store_id.map(Scope::Store).unwrap_or(Scope::Global)),
        }
    }

    // --- KPIs por vendedor ---

    pub async fn seller_kpis(
        &self,
        seller_id: Uuid,
        reference: NaiveDate,
    ) -> Result<SellerKpisResponse, AppError> {
        let (seller, month, goals) = self.assemble_kpis(seller_id, reference).await?;
        Ok(SellerKpisResponse {
            seller,
            month,
            goals,
        })
    }

    /// Variante beta: inclui o recálculo de alvo diário e a super meta.
    pub async fn seller_kpis_beta(
        &self,
        seller_id: Uuid,
        reference: NaiveDate,
    ) -> Result<SellerKpisBetaResponse, AppError> {
        let (seller, month, goals) = self.assemble_kpis(seller_id, reference).await?;

        let goals = goals
            .into_iter()
            .map(|base| {
                let daily = recalculated_daily_target(&base.goal, reference).round_dp(2);
                let gap = stretch_gap(&base.goal).round_dp(2);
                GoalKpisBeta {
                    base,
                    recalculated_daily_target: daily,
                    stretch_gap: gap,
                }
            })
            .collect();

        Ok(SellerKpisBetaResponse {
            seller,
            month,
            goals,
        })
    }

    async fn assemble_kpis(
        &self,
        seller_id: Uuid,
        reference: NaiveDate,
    ) -> Result<(SellerRef, MonthKpis, Vec<GoalKpis>), AppError> {
        let seller = self
            .store_repo
            .find_seller(seller_id)
            .await?
            .ok_or(AppError::SellerNotFound)?;

        let month_window = crate::common::period::month_of(reference);
        let ledger = self
            .ledger
            .compute_ledger(&Scope::Seller(seller_id), &month_window)
            .await?;

        let month = MonthKpis {
            gross_sales: ledger.gross_sales,
            net_sales: ledger.net_sales(),
            ticket_medio: ledger.ticket_medio().round_dp(2),
            pa_produtos_atendimento: ledger.pa_produtos_atendimento().round_dp(2),
            order_count: ledger.order_count,
        };

        let levels = self.commission.active_levels(seller.store_id).await?;
        let goals = self
            .repo
            .seller_goals_active_at(seller_id, reference)
            .await?
            .into_iter()
            .map(|goal| {
                let percentual =
                    progress_percentage(goal.current_value, goal.target_value).round_dp(2);
                let commission = commission::resolve(&levels, percentual, goal.current_value);

                GoalKpis {
                    percentual_atingido: percentual,
                    completed: is_completed(&goal),
                    overdue: is_overdue(&goal, reference),
                    period: classify_period(days_total(&goal)).to_string(),
                    days_total: days_total(&goal),
                    days_elapsed: days_elapsed(&goal, reference),
                    days_remaining: days_remaining(&goal, reference),
                    commission,
                    goal,
                }
            })
            .collect();

        Ok(((&seller).into(), month, goals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn goal(start: NaiveDate, end: NaiveDate, target: Decimal, current: Decimal) -> Goal {
        Goal {
            id: Uuid::new_v4(),
            seller_id: Some(Uuid::new_v4()),
            store_id: None,
            goal_type: "sales".to_string(),
            goal_scope: GoalScope::Individual,
            start_date: start,
            end_date: end,
            target_value: target,
            current_value: current,
            created_at: None,
        }
    }

    #[test]
    fn percentual_acompanha_as_vendas_sem_teto() {
        // 0 -> 0%; 3000 -> 30%; 11000 -> 110% (não trava em 100)
        let target = dec!(10000);
        assert_eq!(progress_percentage(Decimal::ZERO, target), Decimal::ZERO);
        assert_eq!(progress_percentage(dec!(3000), target), dec!(30));
        assert_eq!(progress_percentage(dec!(11000), target), dec!(110));
    }

    #[test]
    fn percentual_com_meta_zero_devolve_zero() {
        assert_eq!(progress_percentage(dec!(500), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn classificacao_por_tamanho_da_janela() {
        assert_eq!(classify_period(1), "daily");
        assert_eq!(classify_period(7), "daily");
        assert_eq!(classify_period(8), "weekly");
        assert_eq!(classify_period(14), "weekly");
        assert_eq!(classify_period(15), "monthly");
        assert_eq!(classify_period(35), "monthly");
        assert_eq!(classify_period(36), "quarterly");
        assert_eq!(classify_period(100), "quarterly");
        assert_eq!(classify_period(101), "custom");
    }

    #[test]
    fn completa_e_ativa_sao_independentes() {
        let reference = date(2026, 8, 6);
        let g = goal(date(2026, 8, 1), date(2026, 8, 31), dec!(1000), dec!(1200));

        // Completa antes de vencer: completa E ativa, nunca "vencida"
        assert!(is_completed(&g));
        assert!(!is_overdue(&g, reference));
    }

    #[test]
    fn vencida_so_quando_passou_e_nao_completou() {
        let reference = date(2026, 8, 6);
        let g = goal(date(2026, 7, 1), date(2026, 7, 31), dec!(1000), dec!(500));
        assert!(is_overdue(&g, reference));

        let g = goal(date(2026, 7, 1), date(2026, 7, 31), dec!(1000), dec!(1000));
        assert!(!is_overdue(&g, reference));
    }

    #[test]
    fn metricas_de_dias_da_meta() {
        let reference = date(2026, 8, 10);
        let g = goal(date(2026, 8, 1), date(2026, 8, 31), dec!(1000), Decimal::ZERO);

        assert_eq!(days_total(&g), 31);
        assert_eq!(days_elapsed(&g, reference), 10);
        assert_eq!(days_remaining(&g, reference), 21);
    }

    #[test]
    fn dias_nao_ficam_negativos() {
        let g = goal(date(2026, 8, 1), date(2026, 8, 31), dec!(1000), Decimal::ZERO);

        // Antes da janela: nada decorrido; depois dela: nada restante
        assert_eq!(days_elapsed(&g, date(2026, 7, 1)), 0);
        assert_eq!(days_remaining(&g, date(2026, 9, 15)), 0);
    }

    #[test]
    fn alvo_diario_recalculado() {
        let reference = date(2026, 8, 21);
        let g = goal(date(2026, 8, 1), date(2026, 8, 31), dec!(10000), dec!(3000));

        // Faltam 7000 em 10 dias
        assert_eq!(recalculated_daily_target(&g, reference), dec!(700));

        // Janela encerrada: alvo diário zero, não divisão por zero
        assert_eq!(recalculated_daily_target(&g, date(2026, 8, 31)), Decimal::ZERO);
    }

    #[test]
    fn super_meta_e_120_por_cento() {
        let g = goal(date(2026, 8, 1), date(2026, 8, 31), dec!(10000), dec!(3000));
        assert_eq!(stretch_gap(&g), dec!(9000));

        // Passou da super meta: distância zero, nunca negativa
        let g = goal(date(2026, 8, 1), date(2026, 8, 31), dec!(10000), dec!(13000));
        assert_eq!(stretch_gap(&g), Decimal::ZERO);
    }

    #[test]
    fn visao_da_meta_arredonda_so_na_saida() {
        let reference = date(2026, 8, 6);
        let g = goal(date(2026, 8, 1), date(2026, 8, 31), dec!(3000), dec!(1000));
        let view = goal_view(g, reference);

        // 1000/3000*100 = 33.333... -> 33.33 na apresentação
        assert_eq!(view.percentual_atingido, dec!(33.33));
        assert_eq!(view.period, "monthly");
    }
}
