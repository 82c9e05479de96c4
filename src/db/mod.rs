pub mod store_repo;
pub use store_repo::StoreRepository;
pub mod ledger_repo;
pub use ledger_repo::LedgerRepository;
pub mod goal_repo;
pub use goal_repo::GoalRepository;
pub mod commission_repo;
pub use commission_repo::CommissionRepository;
pub mod order_repo;
pub use order_repo::OrderRepository;
