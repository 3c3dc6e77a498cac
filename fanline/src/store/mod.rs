//! Local key/value persistence.

mod keys;
mod memory;
mod traits;

pub use keys::{id_for_email, wellknown};
pub use memory::MemoryStore;
pub use traits::{LocalStore, LocalStoreExt};
