//! Row structs and Create/Update/Filter DTOs, one module per table group.

pub mod activity_log;
pub mod biosecurity_case;
pub mod livestock_stock;
pub mod product;
pub mod production_record;
pub mod reference;
pub mod retail_price;
pub mod session;
pub mod user;
