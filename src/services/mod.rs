pub mod ledger;
pub use ledger::LedgerService;
pub mod goals;
pub use goals::GoalService;
pub mod commission;
pub use commission::CommissionService;
pub mod ranking;
pub use ranking::RankingService;
pub mod potential;
pub use potential::PotentialService;
pub mod dashboard;
pub use dashboard::DashboardService;
