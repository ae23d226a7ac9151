pub mod estimate;
pub mod local;
