pub mod account;
pub mod config;
pub mod consent;
pub mod event;
pub mod quest;
pub mod session;
pub mod status;
