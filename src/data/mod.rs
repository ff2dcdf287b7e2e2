//! Data module - CSV loading, typed records and normalization

mod loader;
mod normalizer;
mod records;

pub use loader::{DataLoader, LoaderError, RawRecord, RawTable};
pub use normalizer::{NormalizeError, Normalizer, ACCOUNT_KEY};
pub use records::{AccountKeyed, EngagementRecord, EnrollmentRecord, SubmissionRecord};
