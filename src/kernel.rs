//! Raw fixed-point kernels.
//!
//! Both kernels operate on plain integers so they can be used without the
//! wrapper types, e.g. when the raw bits are already stored elsewhere.
//! Every function is pure and total; see the module docs of [`fix32`] and
//! [`fix64`] for the domain conventions.
//!
//! Approximations come in sibling functions per tier: the unsuffixed name
//! is the most accurate table-driven version, `_fast` and `_fastest` trade
//! accuracy for fewer multiplies. Division and square root additionally
//! have a bit-exact `_precise` variant.

pub mod bits;
pub mod fix32;
pub mod fix64;
pub mod poly;
