pub mod fields;
pub mod hpacucli;
