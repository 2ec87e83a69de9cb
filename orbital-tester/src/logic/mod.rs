pub mod playthrough;
pub mod reports;
pub mod tester;

pub use playthrough::{PlayStrategy, PlaythroughSummary};
pub use tester::*;
