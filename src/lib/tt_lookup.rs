//! Schedule lookup for the SumDU timetable: catalogs of auditoriums, groups and
//! teachers, a bounded history of viewed selections, and the pipeline that turns
//! a schedule response into sections ready to be shown.
pub mod catalog_store;
pub mod error;
pub mod formatting;
pub mod helpers;
pub mod kv_store;
pub mod models;
pub mod pipeline;
pub mod run_tool;
pub mod schedule_getter;
pub mod session;
