pub mod contracts;
pub mod errors;
pub mod models;
pub mod policy;

pub use contracts::{AllocationRequest, CommittedAllocation};
pub use errors::{OperationError, RequiredField, ValidationError, ValidationReport};
pub use models::{AllocationContext, AllocationSummary, BatchLine};
pub use policy::ReconciliationPolicy;
