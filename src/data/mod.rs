pub mod domain;
pub mod nearest;
pub mod series;
