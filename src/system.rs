pub mod fs;
pub mod git;
pub mod github;
pub mod process;
