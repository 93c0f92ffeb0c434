//! Domain Stores Module
//!
//! One `TabularStore` per entity type, with the named lookups and
//! uniqueness rules of that entity.
//!
//! Each domain store derefs to its `TabularStore`, so the generic CRUD and
//! query surface (`find_by_id`, `find_where`, `delete_by_id`, ...) is
//! available directly. Where a store enforces a uniqueness rule it shadows
//! `save`/`save_all`/`update` so the rule is checked under the same lock as
//! the write.

mod customer;
mod reservation;
mod restaurant;
mod section;
mod table;

pub use customer::CustomerStore;
pub use reservation::ReservationStore;
pub use restaurant::RestaurantStore;
pub use section::SectionStore;
pub use table::TableStore;
