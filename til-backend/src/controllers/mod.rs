pub mod health;
pub mod til;
