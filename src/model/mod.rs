pub mod row;
pub mod tick;

pub use row::{NumericRow, SummaryStats};
pub use tick::TickRecord;
