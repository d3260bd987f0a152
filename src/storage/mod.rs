pub mod backend;
pub mod models;

pub use backend::SeaOrmStorage;
pub use models::{ClickEvent, Link};
