// src/services/ranking.rs
//
// Ranking de vendedores por vendas no período, com comparação contra o
// período imediatamente anterior de mesmo comprimento. O ranking usa a soma
// BRUTA dos itens (comportamento histórico do endpoint) — a venda líquida
// fica para o dashboard e os KPIs.

use rust_decimal::Decimal;
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        period::{previous_window, resolve_ranking_window, DateRange, RankingPeriod},
    },
    db::{GoalRepository, LedgerRepository, StoreRepository},
    models::{
        commission::CommissionLevel,
        goal::Goal,
        ranking::{GoalAchievement, RankingEntry, RankingResponse, RankingWindow, SalesComparison},
        sales::SaleRow,
        store::Seller,
    },
    services::{
        commission::{self, CommissionService},
        goals::progress_percentage,
        ledger::Scope,
    },
};

/// Soma bruta (quantidade × preço) por vendedor dentro da janela.
pub fn gross_by_seller(sales: &[SaleRow], range: &DateRange) -> HashMap<Uuid, Decimal> {
    let mut totals: HashMap<Uuid, Decimal> = HashMap::new();
    for row in sales {
        if range.contains(row.sold_at) {
            *totals.entry(row.seller_id).or_default() += row.subtotal();
        }
    }
    totals
}

// Ordena decrescente por vendas preservando a ordem de inserção nos empates
// (sort estável, sem chave secundária). Devolve posições 1-based.
fn positions(sellers: &[Seller], totals: &HashMap<Uuid, Decimal>) -> Vec<(Uuid, Decimal, i64)> {
    let mut ordered: Vec<(Uuid, Decimal)> = sellers
        .iter()
        .map(|s| (s.id, totals.get(&s.id).copied().unwrap_or_default()))
        .collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1));

    ordered
        .into_iter()
        .enumerate()
        .map(|(idx, (id, total))| (id, total, idx as i64 + 1))
        .collect()
}

/// Evolução percentual `(atual - anterior) / anterior × 100`; 0 quando o
/// período anterior foi zero.
pub fn sales_evolution(current: Decimal, previous: Decimal) -> Decimal {
    if previous == Decimal::ZERO {
        return Decimal::ZERO;
    }
    ((current - previous) / previous * Decimal::ONE_HUNDRED).round_dp(2)
}

/// Monta o ranking completo a partir dos agregados já calculados.
/// `goals` vem em ordem de criação: a primeira meta de cada vendedor cuja
/// janela intersecta o período é a que vale.
pub fn assemble_ranking(
    sellers: &[Seller],
    current: &HashMap<Uuid, Decimal>,
    previous: &HashMap<Uuid, Decimal>,
    goals: &[Goal],
    levels: &[CommissionLevel],
) -> Vec<RankingEntry> {
    let current_positions = positions(sellers, current);
    let previous_positions: HashMap<Uuid, i64> = positions(sellers, previous)
        .into_iter()
        .map(|(id, _, pos)| (id, pos))
        .collect();

    let by_id: HashMap<Uuid, &Seller> = sellers.iter().map(|s| (s.id, s)).collect();

    current_positions
        .into_iter()
        .filter_map(|(seller_id, sales_current, position)| {
            let seller = by_id.get(&seller_id)?;
            let sales_previous = previous.get(&seller_id).copied().unwrap_or_default();

            let target = goals
                .iter()
                .find(|g| g.seller_id == Some(seller_id))
                .map(|g| g.target_value)
                .unwrap_or(Decimal::ZERO);
            let percentual = progress_percentage(sales_current, target).round_dp(2);

            let position_evolution = previous_positions
                .get(&seller_id)
                .map(|prev| prev - position)
                .unwrap_or(0);

            Some(RankingEntry {
                position,
                seller: (*seller).into(),
                sales: SalesComparison {
                    current: sales_current,
                    previous: sales_previous,
                    evolution: sales_evolution(sales_current, sales_previous),
                },
                goal: GoalAchievement {
                    target,
                    percentual_atingido: percentual,
                },
                commission: commission::resolve(levels, percentual, sales_current),
                position_evolution,
            })
        })
        .collect()
}

#[derive(Clone)]
pub struct RankingService {
    store_repo: StoreRepository,
    ledger_repo: LedgerRepository,
    goal_repo: GoalRepository,
    commission: CommissionService,
}

impl RankingService {
    pub fn new(
        store_repo: StoreRepository,
        ledger_repo: LedgerRepository,
        goal_repo: GoalRepository,
        commission: CommissionService,
    ) -> Self {
        Self {
            store_repo,
            ledger_repo,
            goal_repo,
            commission,
        }
    }

    pub async fn rank_sellers(
        &self,
        slug: &str,
        period_raw: Option<&str>,
        start_date: Option<chrono::NaiveDate>,
        end_date: Option<chrono::NaiveDate>,
        reference: chrono::NaiveDate,
    ) -> Result<RankingResponse, AppError> {
        let store = self
            .store_repo
            .find_by_slug(slug)
            .await?
            .ok_or(AppError::StoreNotFound)?;

        let period = RankingPeriod::parse(period_raw);
        let window = resolve_ranking_window(period, start_date, end_date, reference)?;
        let previous = previous_window(period, &window);

        let sellers: Vec<Seller> = self
            .store_repo
            .sellers_of_store(store.id)
            .await?
            .into_iter()
            .filter(|s| s.is_active(reference))
            .collect();
        let seller_ids: Vec<Uuid> = sellers.iter().map(|s| s.id).collect();

        // Uma única leitura cobre a janela atual e a anterior
        let filter = self
            .store_repo
            .resolve_scope(&Scope::Store(store.id))
            .await?;
        let combined = DateRange::new(previous.start, window.end);
        let sales = self
            .ledger_repo
            .fetch_sales(filter.as_deref(), &combined)
            .await?;

        let current_totals = gross_by_seller(&sales, &window);
        let previous_totals = gross_by_seller(&sales, &previous);

        let goals = self
            .goal_repo
            .individual_goals_overlapping(&seller_ids, &window)
            .await?;
        let levels = self.commission.active_levels(store.id).await?;

        let ranking = assemble_ranking(&sellers, &current_totals, &previous_totals, &goals, &levels);

        Ok(RankingResponse {
            period: RankingWindow {
                start_date: window.start,
                end_date: window.end,
            },
            ranking,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use crate::models::goal::GoalScope;

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

    fn sale(seller_id: Uuid, day: NaiveDate, qty: i32, price: Decimal) -> SaleRow {
        SaleRow {
            seller_id,
            order_id: Uuid::new_v4(),
            sold_at: day,
            quantity: qty,
            unit_price: price,
        }
    }

    fn individual_goal(seller_id: Uuid, target: Decimal) -> Goal {
        Goal {
            id: Uuid::new_v4(),
            seller_id: Some(seller_id),
            store_id: None,
            goal_type: "sales".to_string(),
            goal_scope: GoalScope::Individual,
            start_date: date(2026, 8, 1),
            end_date: date(2026, 8, 31),
            target_value: target,
            current_value: Decimal::ZERO,
            created_at: None,
        }
    }

    #[test]
    fn ordena_decrescente_por_vendas() {
        // A vende 5000 e B vende 7000: B em primeiro, total bate 12000
        let a = seller("A");
        let b = seller("B");
        let day = date(2026, 8, 5);
        let window = DateRange::new(date(2026, 8, 3), date(2026, 8, 9));

        let sales = vec![
            sale(a.id, day, 1, dec!(5000.00)),
            sale(b.id, day, 1, dec!(7000.00)),
        ];
        let current = gross_by_seller(&sales, &window);

        let entries = assemble_ranking(
            &[a.clone(), b.clone()],
            &current,
            &HashMap::new(),
            &[],
            &[],
        );

        assert_eq!(entries[0].seller.id, b.id);
        assert_eq!(entries[0].position, 1);
        assert_eq!(entries[0].sales.current, dec!(7000.00));
        assert_eq!(entries[1].seller.id, a.id);
        assert_eq!(entries[1].sales.current, dec!(5000.00));

        let soma: Decimal = entries.iter().map(|e| e.sales.current).sum();
        assert_eq!(soma, dec!(12000.00));
    }

    #[test]
    fn empate_mantem_ordem_de_insercao() {
        let a = seller("A");
        let b = seller("B");
        let day = date(2026, 8, 5);
        let window = DateRange::new(date(2026, 8, 3), date(2026, 8, 9));

        let sales = vec![
            sale(a.id, day, 1, dec!(1000.00)),
            sale(b.id, day, 1, dec!(1000.00)),
        ];
        let current = gross_by_seller(&sales, &window);

        let entries =
            assemble_ranking(&[a.clone(), b.clone()], &current, &HashMap::new(), &[], &[]);

        assert_eq!(entries[0].seller.id, a.id);
        assert_eq!(entries[1].seller.id, b.id);
    }

    #[test]
    fn evolucao_de_posicao_positiva_quando_sobe() {
        let a = seller("A");
        let b = seller("B");

        // Semana anterior: A na frente. Semana atual: B vira o jogo.
        let mut previous = HashMap::new();
        previous.insert(a.id, dec!(2000.00));
        previous.insert(b.id, dec!(1000.00));

        let mut current = HashMap::new();
        current.insert(a.id, dec!(1500.00));
        current.insert(b.id, dec!(3000.00));

        let entries = assemble_ranking(&[a.clone(), b.clone()], &current, &previous, &[], &[]);

        let entry_b = entries.iter().find(|e| e.seller.id == b.id).unwrap();
        assert_eq!(entry_b.position, 1);
        assert_eq!(entry_b.position_evolution, 1); // subiu da 2ª para a 1ª

        let entry_a = entries.iter().find(|e| e.seller.id == a.id).unwrap();
        assert_eq!(entry_a.position_evolution, -1);
    }

    #[test]
    fn evolucao_de_vendas_zero_quando_anterior_zero() {
        assert_eq!(sales_evolution(dec!(500), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(sales_evolution(dec!(1500), dec!(1000)), dec!(50));
        assert_eq!(sales_evolution(dec!(750), dec!(1000)), dec!(-25));
    }

    #[test]
    fn meta_e_comissao_anexadas_por_vendedor() {
        let a = seller("A");
        let day = date(2026, 8, 5);
        let window = DateRange::new(date(2026, 8, 1), date(2026, 8, 31));

        let sales = vec![sale(a.id, day, 1, dec!(9000.00))];
        let current = gross_by_seller(&sales, &window);
        let goals = vec![individual_goal(a.id, dec!(10000.00))];

        let levels: Vec<CommissionLevel> = [
            (dec!(70), dec!(3.5)),
            (dec!(80), dec!(4.0)),
            (dec!(90), dec!(4.5)),
            (dec!(100), dec!(5.0)),
        ]
        .into_iter()
        .map(|(a_pct, c_pct)| CommissionLevel {
            id: Uuid::new_v4(),
            store_id: Uuid::new_v4(),
            name: "nível".to_string(),
            achievement_percentage: a_pct,
            commission_percentage: c_pct,
            active: true,
            created_at: None,
        })
        .collect();

        let entries = assemble_ranking(&[a.clone()], &current, &HashMap::new(), &goals, &levels);

        // 9000/10000 = exatamente 90%: pega o degrau de 90, não o de 80
        assert_eq!(entries[0].goal.percentual_atingido, dec!(90));
        assert_eq!(entries[0].commission.percentage, dec!(4.5));
        assert_eq!(entries[0].commission.amount, dec!(405.00));
    }

    #[test]
    fn vendedor_sem_meta_fica_com_atingimento_zero() {
        let a = seller("A");
        let day = date(2026, 8, 5);
        let window = DateRange::new(date(2026, 8, 1), date(2026, 8, 31));

        let sales = vec![sale(a.id, day, 1, dec!(9000.00))];
        let current = gross_by_seller(&sales, &window);

        let entries = assemble_ranking(&[a.clone()], &current, &HashMap::new(), &[], &[]);

        assert_eq!(entries[0].goal.target, Decimal::ZERO);
        assert_eq!(entries[0].goal.percentual_atingido, Decimal::ZERO);
    }
}
