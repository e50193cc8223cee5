pub mod get_wallet_balance;
pub mod process_transaction;
