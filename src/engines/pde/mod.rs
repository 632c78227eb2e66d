//! Finite-difference PDE pricing engines.

pub mod implicit_fd;

pub use implicit_fd::{implicit_fd_price, ImplicitFdEngine};
