pub mod outcome;
pub mod range;
pub mod request;
