pub mod edit;
pub mod entities;
