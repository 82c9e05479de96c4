// src/services/commission.rs
//
// Resolução da comissão: dado o percentual de atingimento da meta e a
// escada de níveis da loja, escolhe o MAIOR limiar que o vendedor alcançou
// (não o primeiro) e aplica a taxa correspondente sobre as vendas.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CommissionRepository,
    models::commission::{CommissionLevel, CommissionResult},
};

// Escada padrão usada apenas quando a loja não configurou nenhum nível.
// Nunca sobrepõe níveis configurados. Abaixo de 70% vale a taxa base.
const FALLBACK_BASE_RATE: Decimal = Decimal::from_parts(35, 0, 0, false, 1); // 3.5%
const FALLBACK_LADDER: [(Decimal, Decimal); 3] = [
    (Decimal::from_parts(70, 0, 0, false, 0), Decimal::from_parts(40, 0, 0, false, 1)),  // 70-89.99% -> 4.0%
    (Decimal::from_parts(90, 0, 0, false, 0), Decimal::from_parts(45, 0, 0, false, 1)),  // 90-109.99% -> 4.5%
    (Decimal::from_parts(110, 0, 0, false, 0), Decimal::from_parts(50, 0, 0, false, 1)), // >= 110% -> 5.0%
];

/// Escolhe a taxa entre os níveis configurados: o maior
/// `achievement_percentage <= atingimento` vence. Abaixo do menor limiar a
/// comissão é zero. Os níveis chegam ordenados de forma ascendente.
pub fn resolve_rate(levels: &[CommissionLevel], achievement: Decimal) -> Decimal {
    let mut rate = Decimal::ZERO;
    for level in levels {
        if level.achievement_percentage <= achievement {
            rate = level.commission_percentage;
        }
    }
    rate
}

/// Escada embutida para lojas sem configuração.
pub fn fallback_rate(achievement: Decimal) -> Decimal {
    let mut rate = FALLBACK_BASE_RATE;
    for (threshold, tier_rate) in FALLBACK_LADDER {
        if achievement >= threshold {
            rate = tier_rate;
        }
    }
    rate
}

/// `valor = vendas × taxa / 100`, arredondado a 2 casas só aqui, no passo
/// final de apresentação.
pub fn commission_amount(sales: Decimal, rate: Decimal) -> Decimal {
    (sales * rate / Decimal::ONE_HUNDRED).round_dp(2)
}

pub fn resolve(levels: &[CommissionLevel], achievement: Decimal, sales: Decimal) -> CommissionResult {
    let rate = if levels.is_empty() {
        fallback_rate(achievement)
    } else {
        resolve_rate(levels, achievement)
    };

    CommissionResult {
        percentage: rate,
        amount: commission_amount(sales, rate),
    }
}

#[derive(Clone)]
pub struct CommissionService {
    repo: CommissionRepository,
}

impl CommissionService {
    pub fn new(repo: CommissionRepository) -> Self {
        Self { repo }
    }

    pub async fn resolve_for_store(
        &self,
        store_id: Uuid,
        achievement: Decimal,
        sales: Decimal,
    ) -> Result<CommissionResult, AppError> {
        let levels = self.repo.active_levels(store_id).await?;
        Ok(resolve(&levels, achievement, sales))
    }

    /// Níveis ativos em ordem ascendente, para quem resolve várias comissões
    /// da mesma loja sem voltar ao banco a cada vendedor.
    pub async fn active_levels(&self, store_id: Uuid) -> Result<Vec<CommissionLevel>, AppError> {
        self.repo.active_levels(store_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn level(achievement: Decimal, commission: Decimal) -> CommissionLevel {
        CommissionLevel {
            id: Uuid::new_v4(),
            store_id: Uuid::new_v4(),
            name: format!("nível {achievement}"),
            achievement_percentage: achievement,
            commission_percentage: commission,
            active: true,
            created_at: None,
        }
    }

    fn ladder() -> Vec<CommissionLevel> {
        vec![
            level(dec!(70), dec!(3.5)),
            level(dec!(80), dec!(4.0)),
            level(dec!(90), dec!(4.5)),
            level(dec!(100), dec!(5.0)),
        ]
    }

    #[test]
    fn atingimento_exato_no_limiar_escolhe_o_proprio_nivel() {
        // 90% em cima do degrau de 90 -> 4.5, não 4.0
        assert_eq!(resolve_rate(&ladder(), dec!(90)), dec!(4.5));
    }

    #[test]
    fn atingimento_entre_niveis_escolhe_o_de_baixo() {
        assert_eq!(resolve_rate(&ladder(), dec!(85)), dec!(4.0));
    }

    #[test]
    fn abaixo_do_menor_limiar_comissao_zero() {
        assert_eq!(resolve_rate(&ladder(), dec!(50)), Decimal::ZERO);
    }

    #[test]
    fn acima_do_maior_limiar_escolhe_o_topo() {
        assert_eq!(resolve_rate(&ladder(), dec!(140)), dec!(5.0));
    }

    #[test]
    fn escada_padrao_so_vale_sem_configuracao() {
        // Loja configurada: a escada embutida não entra
        let result = resolve(&ladder(), dec!(50), dec!(1000));
        assert_eq!(result.percentage, Decimal::ZERO);

        // Loja sem níveis: escada embutida
        let result = resolve(&[], dec!(50), dec!(1000));
        assert_eq!(result.percentage, dec!(3.5));
        assert_eq!(result.amount, dec!(35.00));
    }

    #[test]
    fn faixas_da_escada_padrao() {
        assert_eq!(fallback_rate(dec!(69.99)), dec!(3.5));
        assert_eq!(fallback_rate(dec!(70)), dec!(4.0));
        assert_eq!(fallback_rate(dec!(89.99)), dec!(4.0));
        assert_eq!(fallback_rate(dec!(90)), dec!(4.5));
        assert_eq!(fallback_rate(dec!(109.99)), dec!(4.5));
        assert_eq!(fallback_rate(dec!(110)), dec!(5.0));
    }

    #[test]
    fn valor_arredondado_a_duas_casas() {
        // 333.33 * 4.5% = 14.99985 -> 15.00
        assert_eq!(commission_amount(dec!(333.33), dec!(4.5)), dec!(15.00));
    }
}
