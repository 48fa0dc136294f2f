pub mod repo;
pub mod run;
