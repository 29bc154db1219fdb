mod dense;
mod policy;
mod quad_tree;
mod traits;

pub use dense::DenseGrid;
pub use policy::{MinAdd, MinAssign, RegionAlgebra, SumAdd};
pub use quad_tree::QuadTreeGrid;
pub use traits::{CapacityError, RangeGrid};
