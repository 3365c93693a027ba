pub mod identity;
pub mod numbers;
