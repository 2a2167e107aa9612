pub mod entities;
pub mod errors;
pub mod requests;
pub mod responses;
