pub mod api;
pub mod speak;
