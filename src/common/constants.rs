//! Contains mathematical and physical constants.
use mpi::topology::Rank;










pub const ROOT_RANK: Rank = 0;










// Mathematical
pub const PI: f64 = 3.141592653589793;










// Physical

// Unit Conversion
pub const C_LIGHT: f64 = 299792458.0;
pub const H_PLANCK: f64 = 6.62606896E-34;
pub const BOLTZMANN: f64 = 1.3806504E-23;
pub const RYBDERG: f64 = 10973731.568527;

pub const BOHR_TO_ANGSTROM: f64 = 0.52917720859;
pub const ANGSTROM_TO_BOHR: f64 = 1.0 / BOHR_TO_ANGSTROM;

pub const HARTREE_TO_JOULE: f64 = 2.0 * RYBDERG * H_PLANCK * C_LIGHT;
pub const JOULE_TO_HARTREE: f64 = 1.0 / HARTREE_TO_JOULE;

pub const AU_TO_FEMTOSECOND: f64 = 1.0E15 / (4.0 * PI * RYBDERG * C_LIGHT);
pub const FEMTOSECOND_TO_AU: f64 = 1.0 / AU_TO_FEMTOSECOND;

// Boltzmann constant and reduced Planck constant in Hartree atomic units
pub const KB_AU: f64 = BOLTZMANN * JOULE_TO_HARTREE;                // Hartree/K
pub const HBAR_AU: f64 = 1.0;

// Atomic mass unit in units of the electron mass
pub const MASSUNIT: f64 = 1822.88484264550;










