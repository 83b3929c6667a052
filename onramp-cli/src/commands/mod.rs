pub mod project;
pub mod quota;
pub mod role;
pub mod user;
