pub mod coordinate;
pub mod douglas_peucker;
pub mod error;
pub mod navfile;
pub mod nav_simplification;
