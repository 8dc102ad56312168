pub mod document;
pub mod mounted;
pub mod query;
pub mod storage;
