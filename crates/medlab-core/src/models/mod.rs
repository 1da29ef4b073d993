//! Domain models for the lab records system.

mod hospital;
mod invoice;
mod patient;
mod report;

pub use hospital::*;
pub use invoice::*;
pub use lab_test::*;
pub use patient::*;
pub use report::*;
