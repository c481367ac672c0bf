//! Reference resolution: which declarations the client needs, and in what
//! order they are emitted.

mod builder;
mod enums;
mod model_map;
mod order;
mod references;

pub use builder::{ReferenceBuilder, References};
pub use enums::discover;
pub use model_map::model_map;
pub use order::{order, MAX_VISITS};
pub use references::{resolve, sort, ResolvedReferences};
