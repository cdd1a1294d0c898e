pub mod gateway;
pub mod keys;
pub mod memory;
pub mod s3;
pub mod transition;

pub use gateway::{filter_by_extension, StorageGateway};
pub use keys::{basename, AudioObject, Folder};
pub use memory::{MemoryStorage, StorageOp};
pub use s3::S3Storage;
pub use transition::{StateTransitionManager, Transition, TransitionKind};
