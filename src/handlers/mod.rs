pub mod commission_levels;
pub mod dashboard;
pub mod goals;
pub mod kpis;
pub mod orders;
pub mod ranking;
