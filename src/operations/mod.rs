pub mod query;
pub mod survey;
