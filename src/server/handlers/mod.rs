pub mod health;
pub mod series;
