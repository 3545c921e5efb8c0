pub mod session;
pub mod validate;

pub use session::{AllocationSession, CommitOutcome, LineEdit};
pub use validate::validate;
