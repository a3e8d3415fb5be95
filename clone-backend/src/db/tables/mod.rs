pub mod clones;
pub mod diaries;
pub mod memories;
pub mod users;
