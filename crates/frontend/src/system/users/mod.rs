pub mod api;
pub mod permissions;
pub mod ui;
