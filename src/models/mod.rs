pub mod raid;
