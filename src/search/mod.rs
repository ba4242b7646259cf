pub mod vector;

pub use vector::{VectorHit, VectorStore};
