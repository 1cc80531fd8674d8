mod cat;
mod remote_cat;

pub use cat::{Cat, StoredCat};
pub use remote_cat::RemoteCat;
