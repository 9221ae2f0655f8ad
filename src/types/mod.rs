mod clip;
mod outcome;
mod quality;
mod snapshot;
mod username;

pub use clip::{ClipId, ClipReference, ClipSet, ClipVariant};
pub use outcome::{DownloadOutcome, Summary};
pub use quality::Quality;
pub use snapshot::ArchivedPageReference;
pub use username::Username;
