pub mod event;
pub mod requests;
pub mod responses;
