pub mod deliverable;
pub mod evaluation;
pub mod stored_file;

pub use deliverable::{Deliverable, DeliverableStatus, TransitionError};
pub use evaluation::Evaluation;
pub use stored_file::StoredFile;
