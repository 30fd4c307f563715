pub mod commit_sink;
pub mod repo;
