// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{
        CommissionRepository, GoalRepository, LedgerRepository, OrderRepository, StoreRepository,
    },
    services::{
        CommissionService, DashboardService, GoalService, LedgerService, PotentialService,
        RankingService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    // Repositórios acessados diretamente pelos handlers de CRUD
    pub store_repo: StoreRepository,
    pub commission_repo: CommissionRepository,
    pub order_repo: OrderRepository,
    // Serviços de agregação
    pub goal_service: GoalService,
    pub ranking_service: RankingService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    // A assinatura retorna um Result: se a configuração falhar, a aplicação
    // não deve iniciar.
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let store_repo = StoreRepository::new(db_pool.clone());
        let ledger_repo = LedgerRepository::new(db_pool.clone());
        let goal_repo = GoalRepository::new(db_pool.clone());
        let commission_repo = CommissionRepository::new(db_pool.clone());
        let order_repo = OrderRepository::new(db_pool.clone());

        let ledger_service = LedgerService::new(store_repo.clone(), ledger_repo.clone());
        let commission_service = CommissionService::new(commission_repo.clone());
        let goal_service = GoalService::new(
            goal_repo.clone(),
            store_repo.clone(),
            ledger_service.clone(),
            commission_service.clone(),
        );
        let ranking_service = RankingService::new(
            store_repo.clone(),
            ledger_repo.clone(),
            goal_repo.clone(),
            commission_service.clone(),
        );
        let potential_service = PotentialService::new(store_repo.clone(), ledger_service.clone());
        let dashboard_service = DashboardService::new(
            store_repo.clone(),
            goal_repo,
            ledger_service,
            commission_service,
            potential_service,
        );

        Ok(Self {
            db_pool,
            store_repo,
            commission_repo,
            order_repo,
            goal_service,
            ranking_service,
            dashboard_service,
        })
    }
}
