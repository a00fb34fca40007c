pub mod appointment;
pub mod audit;
pub mod branch;
pub mod common;
pub mod dashboard;
pub mod doctor;
pub mod enums;
pub mod patient;
pub mod patient_history;
pub mod radiologist;
pub mod representative;
pub mod scan;
pub mod stock;
pub mod user;

pub use appointment::*;
pub use audit::*;
pub use branch::*;
pub use common::*;
pub use dashboard::*;
pub use doctor::*;
pub use enums::*;
pub use patient::*;
pub use patient_history::*;
pub use radiologist::*;
pub use representative::*;
pub use scan::*;
pub use stock::*;
pub use user::*;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}
