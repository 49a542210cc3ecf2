pub mod job;
pub mod transcript;
