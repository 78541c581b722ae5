//! Platform abstraction traits (spec.md §1: "the underlying switch driver
//! used to pin the PAE group MAC to the CPU port and to set port
//! forwarding state" and "the raw socket/NIC driver" are external
//! collaborators this crate only declares interfaces for).

mod link;
mod radius;
mod switch;

pub use link::*;
pub use radius::*;
pub use switch::*;
