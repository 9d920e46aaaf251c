//! Stateless repository structs, one per table group.
//!
//! Repositories take `&PgPool` per call and assemble SQL with `format!` over
//! a per-table `COLUMNS` constant. Soft-deletable tables share the
//! [`NOT_DELETED`] fragment so "not deleted" means the same thing everywhere.

pub mod activity_log_repo;
pub mod biosecurity_case_repo;
pub mod livestock_stock_repo;
pub mod product_repo;
pub mod production_record_repo;
pub mod reference_repo;
pub mod retail_price_repo;
pub mod session_repo;
pub mod user_repo;

pub use activity_log_repo::ActivityLogRepo;
pub use biosecurity_case_repo::BiosecurityCaseRepo;
pub use livestock_stock_repo::LivestockStockRepo;
pub use product_repo::ProductRepo;
pub use production_record_repo::ProductionRecordRepo;
pub use reference_repo::{
    CommodityRepo, DistrictRepo, OffenceTypeRepo, PremiseRepo, RegionRepo, SpeciesRepo,
};
pub use retail_price_repo::RetailPriceRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;

/// Shared "not deleted" query fragment for soft-deletable tables.
pub(crate) const NOT_DELETED: &str = "deleted_at IS NULL";
