pub mod caller;
pub mod request;
pub mod response;
