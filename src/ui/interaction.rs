pub mod roi;
pub mod transform;
pub mod wheel;
