pub mod email;
pub mod notification;
pub mod password;
pub mod principal;
pub mod role;
pub mod token;
