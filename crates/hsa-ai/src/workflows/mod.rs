pub mod assistant;
pub mod enrollment;
