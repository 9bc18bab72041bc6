//! Ring-polymer PIMD
//!
//! A path-integral molecular dynamics propagator: an ensemble of coupled
//! replicas ("worlds") of one atomic system is advanced so that its
//! statistical average reproduces quantum thermal effects classically. The
//! crate owns the ring-polymer normal-mode transform, the all-to-all
//! exchange of per-atom quantities across the distributed replica worlds,
//! the PILE/SVR stochastic thermostats with the BZP/MTTK barostats, and the
//! OBABO/BAOAB operator-splitting integration. The host simulation engine
//! keeps the timestep loop, the force evaluation, and the spatial
//! decomposition, and talks to the propagator through the lifecycle calls
//! in [`pimd::traits::PathIntegralStepper`].

pub mod common;
pub mod io;
pub mod matrix;
pub mod pimd;




