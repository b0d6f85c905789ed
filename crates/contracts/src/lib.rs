//! Types shared between the backend and the frontend

pub mod enums;
pub mod system;
