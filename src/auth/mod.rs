pub mod credentials;
pub mod refresher;
pub mod resolver;
