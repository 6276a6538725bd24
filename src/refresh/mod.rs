pub mod controller;
pub mod loop_worker;

pub use controller::RefreshController;
pub use loop_worker::refresh_once;
