pub mod development;
pub mod production;
