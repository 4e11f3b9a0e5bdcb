pub mod build;
pub mod detect;
pub mod docs;
