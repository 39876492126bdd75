// Entity Models
//
// Records carry a stable identity (the employee name) plus values
// (amount, category). Deduplication works on identity only.

pub mod category;
pub mod record;

pub use category::Category;
pub use record::Record;
