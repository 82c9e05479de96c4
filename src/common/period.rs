// src/common/period.rs
//
// Resolução de períodos de calendário. Todas as funções recebem a data de
// referência explicitamente — nada aqui lê o relógio do sistema, o que
// mantém os cálculos determinísticos e testáveis.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::Deserialize;

use crate::common::error::AppError;

/// Janela inclusiva de datas `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Quantidade de dias da janela, contagem inclusiva.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Período aceito pelo ranking de vendedores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankingPeriod {
    Week,
    Month,
    Quarter,
    Year,
    Custom,
}

impl RankingPeriod {
    // Qualquer valor desconhecido cai na semana corrente (comportamento
    // histórico do endpoint).
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("week") => RankingPeriod::Week,
            Some("month") => RankingPeriod::Month,
            Some("quarter") => RankingPeriod::Quarter,
            Some("year") => RankingPeriod::Year,
            Some("custom") => RankingPeriod::Custom,
            _ => RankingPeriod::Week,
        }
    }
}

pub fn week_of(reference: NaiveDate) -> DateRange {
    let week = reference.week(Weekday::Mon);
    DateRange::new(week.first_day(), week.last_day())
}

pub fn month_of(reference: NaiveDate) -> DateRange {
    let start = reference.with_day(1).unwrap_or(reference);
    DateRange::new(start, last_day_of_month(reference.year(), reference.month()))
}

pub fn quarter_of(reference: NaiveDate) -> DateRange {
    let first_month = ((reference.month0() / 3) * 3) + 1;
    let start = NaiveDate::from_ymd_opt(reference.year(), first_month, 1)
        .unwrap_or(reference);
    DateRange::new(start, last_day_of_month(reference.year(), first_month + 2))
}

pub fn year_of(reference: NaiveDate) -> DateRange {
    let start = NaiveDate::from_ymd_opt(reference.year(), 1, 1).unwrap_or(reference);
    let end = NaiveDate::from_ymd_opt(reference.year(), 12, 31).unwrap_or(reference);
    DateRange::new(start, end)
}

pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .expect("mês válido");
    first
        .checked_add_months(Months::new(1))
        .and_then(|d| d.checked_sub_days(Days::new(1)))
        .expect("último dia do mês")
}

/// Resolve a janela do ranking a partir do período pedido.
/// `custom` exige as duas datas; as demais usam limites de calendário.
pub fn resolve_ranking_window(
    period: RankingPeriod,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    reference: NaiveDate,
) -> Result<DateRange, AppError> {
    match period {
        RankingPeriod::Week => Ok(week_of(reference)),
        RankingPeriod::Month => Ok(month_of(reference)),
        RankingPeriod::Quarter => Ok(quarter_of(reference)),
        RankingPeriod::Year => Ok(year_of(reference)),
        RankingPeriod::Custom => match (start, end) {
            (Some(s), Some(e)) if e >= s => Ok(DateRange::new(s, e)),
            _ => Err(AppError::InvalidDateRange),
        },
    }
}

/// Janela imediatamente anterior, de mesmo comprimento. Para períodos
/// nomeados a janela anterior é o período de calendário anterior.
pub fn previous_window(period: RankingPeriod, window: &DateRange) -> DateRange {
    match period {
        RankingPeriod::Week => shift_back_days(window, 7),
        RankingPeriod::Month => {
            let prev = window
                .start
                .checked_sub_months(Months::new(1))
                .unwrap_or(window.start);
            month_of(prev)
        }
        RankingPeriod::Quarter => {
            let prev = window
                .start
                .checked_sub_months(Months::new(3))
                .unwrap_or(window.start);
            quarter_of(prev)
        }
        RankingPeriod::Year => {
            let prev = window
                .start
                .checked_sub_months(Months::new(12))
                .unwrap_or(window.start);
            year_of(prev)
        }
        RankingPeriod::Custom => shift_back_days(window, window.days()),
    }
}

fn shift_back_days(window: &DateRange, days: i64) -> DateRange {
    let days = Days::new(days.unsigned_abs());
    DateRange::new(
        window.start.checked_sub_days(days).unwrap_or(window.start),
        window.end.checked_sub_days(days).unwrap_or(window.end),
    )
}

// Início da série histórica para janelas "all-time". Antes disso não há
// pedidos importados.
const EPOCH: Option<NaiveDate> = NaiveDate::from_ymd_opt(2000, 1, 1);

/// Janela do dashboard: `current-month`, `all-time`, `YYYY-MM` ou o padrão
/// (último ano corrido até a referência).
pub fn resolve_dashboard_window(period: Option<&str>, reference: NaiveDate) -> DateRange {
    match period {
        Some("current-month") => month_of(reference),
        Some("all-time") => DateRange::new(EPOCH.expect("data fixa"), reference),
        Some(raw) => match parse_year_month(raw) {
            Some((year, month)) => DateRange::new(
                NaiveDate::from_ymd_opt(year, month, 1).expect("mês válido"),
                last_day_of_month(year, month),
            ),
            None => trailing_year(reference),
        },
        None => trailing_year(reference),
    }
}

fn trailing_year(reference: NaiveDate) -> DateRange {
    let start = reference
        .checked_sub_months(Months::new(12))
        .and_then(|d| d.checked_add_days(Days::new(1)))
        .unwrap_or(reference);
    DateRange::new(start, reference)
}

fn parse_year_month(raw: &str) -> Option<(i32, u32)> {
    let (year, month) = raw.split_once('-')?;
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    if (1..=12).contains(&month) {
        Some((year, month))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn semana_comeca_na_segunda() {
        // 2026-08-06 é uma quinta-feira
        let window = week_of(date(2026, 8, 6));
        assert_eq!(window.start, date(2026, 8, 3));
        assert_eq!(window.end, date(2026, 8, 9));
        assert_eq!(window.days(), 7);
    }

    #[test]
    fn trimestre_do_meio_do_ano() {
        let window = quarter_of(date(2026, 8, 6));
        assert_eq!(window.start, date(2026, 7, 1));
        assert_eq!(window.end, date(2026, 9, 30));
    }

    #[test]
    fn janela_anterior_de_mes_respeita_calendario() {
        let window = month_of(date(2026, 3, 15));
        let prev = previous_window(RankingPeriod::Month, &window);
        assert_eq!(prev.start, date(2026, 2, 1));
        assert_eq!(prev.end, date(2026, 2, 28));
    }

    #[test]
    fn janela_anterior_custom_tem_mesmo_comprimento() {
        let window = DateRange::new(date(2026, 8, 1), date(2026, 8, 10));
        let prev = previous_window(RankingPeriod::Custom, &window);
        assert_eq!(prev.days(), window.days());
        assert_eq!(prev.end, date(2026, 7, 31));
        assert_eq!(prev.start, date(2026, 7, 22));
    }

    #[test]
    fn custom_sem_datas_e_rejeitado() {
        let result = resolve_ranking_window(RankingPeriod::Custom, None, None, date(2026, 8, 6));
        assert!(result.is_err());
    }

    #[test]
    fn periodo_desconhecido_vira_semana() {
        assert_eq!(RankingPeriod::parse(Some("decade")), RankingPeriod::Week);
        assert_eq!(RankingPeriod::parse(None), RankingPeriod::Week);
    }

    #[test]
    fn dashboard_aceita_ano_mes() {
        let window = resolve_dashboard_window(Some("2026-02"), date(2026, 8, 6));
        assert_eq!(window.start, date(2026, 2, 1));
        assert_eq!(window.end, date(2026, 2, 28));
    }

    #[test]
    fn dashboard_padrao_e_ultimo_ano() {
        let window = resolve_dashboard_window(None, date(2026, 8, 6));
        assert_eq!(window.end, date(2026, 8, 6));
        assert_eq!(window.start, date(2025, 8, 7));
    }
}
