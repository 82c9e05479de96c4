// src/services/ledger.rs
//
// O livro-razão: vendas brutas, devoluções e trocas de um escopo dentro de
// uma janela, agregados em memória a partir das linhas cruas do banco.
// A fórmula de vendas líquidas definida aqui é a ÚNICA usada no sistema —
// dashboard, ranking e KPIs passam todos por `Ledger::net_sales`.

use rust_decimal::Decimal;
use std::collections::HashSet;
use uuid::Uuid;

use crate::{
    common::{error::AppError, period::DateRange},
    db::{LedgerRepository, StoreRepository},
    models::sales::{ExchangeRow, ReturnRow, SaleRow},
};

/// Escopo de agregação. A resolução produz um conjunto de vendedores;
/// `Global` significa "sem filtro" (todos os pedidos).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Seller(Uuid),
    Store(Uuid),
    Global,
}

/// Valores agregados de um escopo em uma janela. Escopo sem pedidos produz
/// tudo zero — nunca nulo, nunca erro.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ledger {
    pub gross_sales: Decimal,
    pub returned_value: Decimal,
    pub credit_exchange_value: Decimal,
    pub debit_exchange_value: Decimal,
    pub order_count: i64,
    pub item_quantity: i64,
}

impl Ledger {
    /// Agrega linhas cruas, filtrando pela janela (e opcionalmente por um
    /// vendedor, para fatiar um conjunto já buscado).
    pub fn from_rows_filtered(
        sales: &[SaleRow],
        returns: &[ReturnRow],
        exchanges: &[ExchangeRow],
        range: &DateRange,
        seller: Option<Uuid>,
    ) -> Self {
        let mut ledger = Ledger::default();
        let mut orders = HashSet::new();

        for row in sales {
            if !range.contains(row.sold_at) {
                continue;
            }
            if seller.is_some_and(|id| id != row.seller_id) {
                continue;
            }
            ledger.gross_sales += row.subtotal();
            ledger.item_quantity += i64::from(row.quantity);
            orders.insert(row.order_id);
        }
        ledger.order_count = orders.len() as i64;

        for row in returns {
            if !range.contains(row.processed_at) {
                continue;
            }
            if seller.is_some() && row.seller_id != seller {
                continue;
            }
            // Devolução ainda sem valor derivável contribui com zero
            ledger.returned_value += row.return_value.unwrap_or(Decimal::ZERO);
        }

        for row in exchanges {
            if !range.contains(row.processed_at) {
                continue;
            }
            if seller.is_some() && row.seller_id != seller {
                continue;
            }
            if row.is_credit {
                ledger.credit_exchange_value += row.voucher_value;
            } else {
                ledger.debit_exchange_value += row.voucher_value;
            }
        }

        ledger
    }

    pub fn from_rows(
        sales: &[SaleRow],
        returns: &[ReturnRow],
        exchanges: &[ExchangeRow],
        range: &DateRange,
    ) -> Self {
        Self::from_rows_filtered(sales, returns, exchanges, range, None)
    }

    /// A fórmula canônica. As DUAS direções de troca reduzem a venda
    /// líquida: uma troca substitui a venda original independentemente da
    /// direção do vale. O resultado pode ser negativo (período pesado de
    /// devoluções) e os chamadores toleram isso.
    pub fn net_sales(&self) -> Decimal {
        self.gross_sales
            - self.returned_value
            - self.credit_exchange_value
            - self.debit_exchange_value
    }

    /// Valor médio por pedido; 0 quando não há pedidos.
    pub fn ticket_medio(&self) -> Decimal {
        if self.order_count == 0 {
            return Decimal::ZERO;
        }
        self.net_sales() / Decimal::from(self.order_count)
    }

    /// Produtos por atendimento; 0 quando não há pedidos.
    pub fn pa_produtos_atendimento(&self) -> Decimal {
        if self.order_count == 0 {
            return Decimal::ZERO;
        }
        Decimal::from(self.item_quantity) / Decimal::from(self.order_count)
    }
}

/// Linhas cruas de um escopo, buscadas uma vez e fatiadas por janela ou por
/// vendedor sem voltar ao banco.
pub struct LedgerRows {
    pub sales: Vec<SaleRow>,
    pub returns: Vec<ReturnRow>,
    pub exchanges: Vec<ExchangeRow>,
}

impl LedgerRows {
    pub fn ledger(&self, range: &DateRange) -> Ledger {
        Ledger::from_rows(&self.sales, &self.returns, &self.exchanges, range)
    }

    pub fn ledger_for_seller(&self, seller: Uuid, range: &DateRange) -> Ledger {
        Ledger::from_rows_filtered(&self.sales, &self.returns, &self.exchanges, range, Some(seller))
    }
}

#[derive(Clone)]
pub struct LedgerService {
    store_repo: StoreRepository,
    repo: LedgerRepository,
}

impl LedgerService {
    pub fn new(store_repo: StoreRepository, repo: LedgerRepository) -> Self {
        Self { store_repo, repo }
    }

    /// Busca as linhas cruas de um escopo, já com os valores de devolução
    /// memoizados.
    pub async fn fetch_rows(
        &self,
        scope: &Scope,
        range: &DateRange,
    ) -> Result<LedgerRows, AppError> {
        let filter = self.store_repo.resolve_scope(scope).await?;
        let sales = self.repo.fetch_sales(filter.as_deref(), range).await?;
        let returns = self.repo.fetch_returns(filter.as_deref(), range).await?;
        let returns = self.hydrate_return_values(returns).await?;
        let exchanges = self.repo.fetch_exchanges(filter.as_deref(), range).await?;

        Ok(LedgerRows {
            sales,
            returns,
            exchanges,
        })
    }

    pub async fn compute_ledger(
        &self,
        scope: &Scope,
        range: &DateRange,
    ) -> Result<Ledger, AppError> {
        let rows = self.fetch_rows(scope, range).await?;
        Ok(rows.ledger(range))
    }

    pub async fn net_sales(&self, scope: &Scope, range: &DateRange) -> Result<Decimal, AppError> {
        Ok(self.compute_ledger(scope, range).await?.net_sales())
    }

    /// Deriva e persiste `return_value` quando ausente:
    /// quantidade devolvida × preço unitário médio do produto para aquele
    /// vendedor. Sem vínculo ou sem histórico, a devolução contribui com
    /// zero e o buraco fica registrado no log.
    async fn hydrate_return_values(
        &self,
        mut returns: Vec<ReturnRow>,
    ) -> Result<Vec<ReturnRow>, AppError> {
        for row in returns.iter_mut() {
            if row.return_value.is_some() {
                continue;
            }
            match (row.product_id, row.seller_id) {
                (Some(product_id), Some(seller_id)) => {
                    match self.repo.average_unit_price(product_id, seller_id).await? {
                        Some(avg) => {
                            let value = avg * Decimal::from(row.quantity_returned);
                            self.repo.set_return_value(row.id, value).await?;
                            row.return_value = Some(value);
                        }
                        None => {
                            tracing::warn!(
                                return_id = %row.id,
                                "Devolução sem histórico de preço do produto; contribuição zero"
                            );
                        }
                    }
                }
                _ => {
                    tracing::warn!(
                        return_id = %row.id,
                        "Devolução sem vínculo de produto/vendedor; contribuição zero"
                    );
                }
            }
        }
        Ok(returns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sale(seller: Uuid, order: Uuid, day: NaiveDate, qty: i32, price: Decimal) -> SaleRow {
        SaleRow {
            seller_id: seller,
            order_id: order,
            sold_at: day,
            quantity: qty,
            unit_price: price,
        }
    }

    fn retorno(seller: Uuid, day: NaiveDate, value: Option<Decimal>) -> ReturnRow {
        ReturnRow {
            id: Uuid::new_v4(),
            seller_id: Some(seller),
            product_id: None,
            quantity_returned: 1,
            return_value: value,
            processed_at: day,
        }
    }

    fn troca(seller: Uuid, day: NaiveDate, value: Decimal, is_credit: bool) -> ExchangeRow {
        ExchangeRow {
            id: Uuid::new_v4(),
            seller_id: Some(seller),
            voucher_value: value,
            is_credit,
            processed_at: day,
        }
    }

    #[test]
    fn escopo_sem_pedidos_zera_tudo() {
        let range = DateRange::new(date(2026, 8, 1), date(2026, 8, 31));
        let ledger = Ledger::from_rows(&[], &[], &[], &range);

        assert_eq!(ledger.gross_sales, Decimal::ZERO);
        assert_eq!(ledger.net_sales(), Decimal::ZERO);
        assert_eq!(ledger.ticket_medio(), Decimal::ZERO);
        assert_eq!(ledger.pa_produtos_atendimento(), Decimal::ZERO);
    }

    #[test]
    fn venda_liquida_desconta_devolucoes_e_trocas_nas_duas_direcoes() {
        let seller = Uuid::new_v4();
        let day = date(2026, 8, 5);
        let range = DateRange::new(date(2026, 8, 1), date(2026, 8, 31));

        let sales = vec![sale(seller, Uuid::new_v4(), day, 4, dec!(250.00))];
        let returns = vec![retorno(seller, day, Some(dec!(100.00)))];
        let exchanges = vec![
            troca(seller, day, dec!(50.00), true),
            troca(seller, day, dec!(30.00), false),
        ];

        let ledger = Ledger::from_rows(&sales, &returns, &exchanges, &range);

        assert_eq!(ledger.gross_sales, dec!(1000.00));
        assert_eq!(ledger.returned_value, dec!(100.00));
        assert_eq!(ledger.credit_exchange_value, dec!(50.00));
        assert_eq!(ledger.debit_exchange_value, dec!(30.00));
        // bruto - devoluções - trocas crédito - trocas débito
        assert_eq!(ledger.net_sales(), dec!(820.00));
    }

    #[test]
    fn devolucao_no_mesmo_preco_reduz_a_metade() {
        // Pedido de 2 unidades a 150 e devolução de 1 unidade: 300 - 150
        let seller = Uuid::new_v4();
        let day = date(2026, 8, 5);
        let range = DateRange::new(date(2026, 8, 1), date(2026, 8, 31));

        let sales = vec![sale(seller, Uuid::new_v4(), day, 2, dec!(150.00))];
        let returns = vec![retorno(seller, day, Some(dec!(150.00)))];

        let ledger = Ledger::from_rows(&sales, &returns, &[], &range);
        assert_eq!(ledger.net_sales(), dec!(150.00));
    }

    #[test]
    fn venda_liquida_pode_ser_negativa() {
        let seller = Uuid::new_v4();
        let day = date(2026, 8, 5);
        let range = DateRange::new(date(2026, 8, 1), date(2026, 8, 31));

        let sales = vec![sale(seller, Uuid::new_v4(), day, 1, dec!(100.00))];
        let returns = vec![retorno(seller, day, Some(dec!(300.00)))];

        let ledger = Ledger::from_rows(&sales, &returns, &[], &range);
        assert_eq!(ledger.net_sales(), dec!(-200.00));
    }

    #[test]
    fn linhas_fora_da_janela_sao_ignoradas() {
        let seller = Uuid::new_v4();
        let range = DateRange::new(date(2026, 8, 1), date(2026, 8, 31));

        let sales = vec![
            sale(seller, Uuid::new_v4(), date(2026, 7, 31), 1, dec!(100.00)),
            sale(seller, Uuid::new_v4(), date(2026, 8, 1), 1, dec!(40.00)),
            sale(seller, Uuid::new_v4(), date(2026, 9, 1), 1, dec!(100.00)),
        ];

        let ledger = Ledger::from_rows(&sales, &[], &[], &range);
        assert_eq!(ledger.gross_sales, dec!(40.00));
        assert_eq!(ledger.order_count, 1);
    }

    #[test]
    fn devolucao_sem_valor_derivado_contribui_zero() {
        let seller = Uuid::new_v4();
        let day = date(2026, 8, 5);
        let range = DateRange::new(date(2026, 8, 1), date(2026, 8, 31));

        let returns = vec![retorno(seller, day, None)];
        let ledger = Ledger::from_rows(&[], &returns, &[], &range);

        assert_eq!(ledger.returned_value, Decimal::ZERO);
    }

    #[test]
    fn ticket_medio_e_pa_por_pedido() {
        let seller = Uuid::new_v4();
        let order_a = Uuid::new_v4();
        let order_b = Uuid::new_v4();
        let day = date(2026, 8, 5);
        let range = DateRange::new(date(2026, 8, 1), date(2026, 8, 31));

        // Dois pedidos, três itens, 5 unidades no total
        let sales = vec![
            sale(seller, order_a, day, 2, dec!(100.00)),
            sale(seller, order_a, day, 1, dec!(50.00)),
            sale(seller, order_b, day, 2, dec!(75.00)),
        ];

        let ledger = Ledger::from_rows(&sales, &[], &[], &range);
        assert_eq!(ledger.order_count, 2);
        assert_eq!(ledger.item_quantity, 5);
        assert_eq!(ledger.ticket_medio(), dec!(200.00));
        assert_eq!(ledger.pa_produtos_atendimento(), dec!(2.5));
    }

    #[test]
    fn fatia_por_vendedor_soma_com_o_total() {
        // Consistência entre caminhos: a soma das fatias por vendedor bate
        // com o agregado da loja
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let day = date(2026, 8, 5);
        let range = DateRange::new(date(2026, 8, 3), date(2026, 8, 9));

        let sales = vec![
            sale(a, Uuid::new_v4(), day, 1, dec!(5000.00)),
            sale(b, Uuid::new_v4(), day, 1, dec!(7000.00)),
        ];

        let rows = LedgerRows {
            sales,
            returns: vec![],
            exchanges: vec![],
        };

        let total = rows.ledger(&range).net_sales();
        let parte_a = rows.ledger_for_seller(a, &range).net_sales();
        let parte_b = rows.ledger_for_seller(b, &range).net_sales();

        assert_eq!(parte_a, dec!(5000.00));
        assert_eq!(parte_b, dec!(7000.00));
        assert_eq!(total, dec!(12000.00));
        assert_eq!(parte_a + parte_b, total);
    }
}
