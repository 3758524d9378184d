pub mod analysis;
pub mod file;
pub mod generation;
pub mod jobs;
pub mod profile;
pub mod user;
