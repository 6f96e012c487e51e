pub mod handlers;
pub mod keywords;
pub mod ranking;
pub mod service;
