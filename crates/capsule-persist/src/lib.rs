pub mod atomic_write;
pub mod compat;
pub mod compress;
pub mod error;
pub mod format;
pub mod load;
pub mod save;
pub mod store;

#[cfg(test)]
mod test_dir;

pub use error::PersistError;
pub use format::BlueprintHeader;
pub use load::{decode, read_summary, BlueprintSummary};
pub use save::encode;
pub use store::BlueprintStore;
