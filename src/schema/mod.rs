pub mod scene;
pub mod stats;
pub mod transition;
