pub mod editing;
pub mod focus;
pub mod ledger;
pub mod session;
