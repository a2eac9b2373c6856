pub mod cart;
pub mod category;
pub mod customer;
pub mod order;
pub mod product;
