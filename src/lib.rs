pub mod error;
pub mod validation;
pub mod model;
pub mod db;
pub mod solver;
pub mod queries;
pub mod lifecycle;
pub mod notify;
pub mod ops;
