pub mod abandon;
pub mod advance;
pub mod answer;
pub mod dispatch;
pub mod report;
pub mod resume;
pub mod sample;
pub mod schema;
pub mod shared;
pub mod skip;
pub mod start;
pub mod types;
