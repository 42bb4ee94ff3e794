pub mod product;
pub mod scan;
