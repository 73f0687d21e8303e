pub mod amount;
pub mod error;
pub mod expense;
pub mod settlement;
pub mod split;
pub mod transfer;
pub mod user;
