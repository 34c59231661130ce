#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use stencil_grid as grid;

#[doc(inline)]
pub use stencil_filter as filter;

#[doc(inline)]
pub use stencil_io as io;
