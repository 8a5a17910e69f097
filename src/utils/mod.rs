pub mod similarity;
pub mod stats;
