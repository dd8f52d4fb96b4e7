pub mod layer;
pub mod memory;
pub mod poller;
pub mod stats;

pub use layer::{MapSurface, MarkerLayer};
pub use memory::MemoryMap;
pub use poller::{ErrorCallback, Fetch, Poller};
pub use stats::PollStats;
