mod intake;
mod notifier;
mod progress;
mod queue;
mod types;
mod validator;

pub use intake::{BatchOutcome, BatchReport, FileIntake, UploadCallback};
pub use notifier::{AlertQueue, Notifier};
pub use progress::{DriverHandle, ProgressDriver, ProgressSource, SimulatedProgress};
pub use queue::{Advance, IntakeQueue, COMPLETE};
pub use types::{BatchSource, CandidateFile, FileId, TrackedFile, UploadStatus};
pub use validator::{file_extension, validate, Rejection};
