pub mod pages;
pub mod speech;
