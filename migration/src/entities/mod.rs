pub mod click;
pub mod link;
