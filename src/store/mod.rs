//! This module acts as a central hub for all account-storage logic.
//! It declares the contract plus the concrete backends so they can be
//! reached elsewhere via their full path, e.g. `store::postgres::PgAccountStore`.

pub mod accounts;
pub mod memory;
pub mod postgres;
