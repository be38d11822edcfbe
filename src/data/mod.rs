pub mod export;
pub mod import;
pub mod player;
pub mod projections;
pub mod validate;
