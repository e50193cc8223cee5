pub mod asset_type_repository;
pub mod ledger_repository;
pub mod models;
pub mod store;
pub mod transaction_repository;
pub mod wallet_repository;
