mod item;

pub use item::extract_scalar;
