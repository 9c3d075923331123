pub mod classification;
pub mod error;
pub mod holding;
pub mod portfolio;
