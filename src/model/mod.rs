pub mod attendance;
pub mod leave_request;
pub mod message;
pub mod payroll;
pub mod role;
pub mod user;
