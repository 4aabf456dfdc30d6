//! Query filters shared by search and listing: an inclusive date range on
//! conversation activity and limit/offset pagination.

pub mod date_range;
pub mod pagination;

pub use date_range::DateRange;
pub use pagination::{DEFAULT_LIMIT, MAX_LIMIT, Pagination};
