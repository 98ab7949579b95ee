pub mod calls;
pub mod readiness;
pub mod scripts;
