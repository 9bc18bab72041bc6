//! About the input parameters.
use crate::common::error::*;
use phf::phf_map;





/// Propagation method for the ring polymer: direct Cartesian beads, normal
/// modes, or centroid-mode dynamics.
#[derive(Clone, Debug, PartialEq)]
pub enum Method
{
    Pimd,
    NmPimd,
    Cmd,
}

/// Operator-splitting ordering of the integration step.
#[derive(Clone, Debug, PartialEq)]
pub enum Splitting
{
    Obabo,
    Baoab,
}

/// Statistical ensemble sampled by the propagator.
#[derive(Clone, Debug, PartialEq)]
pub enum Ensemble
{
    Nve,
    Nvt,
    Nph,
    Npt,
}

/// Stochastic thermostat policy applied in the O half-steps.
#[derive(Clone, Debug, PartialEq)]
pub enum ThermostatKind
{
    PileL,
    PileG,
    Svr,
}

/// Extended-system barostat formulation coupled to the box volume.
#[derive(Clone, Debug, PartialEq)]
pub enum BarostatKind
{
    Bzp,
    Mttk,
}

/// Fictitious-mass mode of the non-centroid normal modes.
#[derive(Clone, Debug, PartialEq)]
pub enum FmMode
{
    Physical,
    Normal,
}

/// Interpolation method for the thermodynamic integration.
#[derive(Clone, Debug, PartialEq)]
pub enum TiMethod
{
    Msti,
    Scti,
}





// 'STR_TO_METHOD' is a static structure of type 'phf::Map', initialized by macro 'phf_map'
static STR_TO_METHOD: phf::Map<&'static str, Method> = phf_map!
{
    "pimd" => Method::Pimd,
    "nmpimd" => Method::NmPimd,
    "cmd" => Method::Cmd,
};

static STR_TO_SPLITTING: phf::Map<&'static str, Splitting> = phf_map!
{
    "obabo" => Splitting::Obabo,
    "baoab" => Splitting::Baoab,
};

static STR_TO_ENSEMBLE: phf::Map<&'static str, Ensemble> = phf_map!
{
    "nve" => Ensemble::Nve,
    "nvt" => Ensemble::Nvt,
    "nph" => Ensemble::Nph,
    "npt" => Ensemble::Npt,
};

static STR_TO_THERMOSTAT: phf::Map<&'static str, ThermostatKind> = phf_map!
{
    "pile_l" => ThermostatKind::PileL,
    "pile_g" => ThermostatKind::PileG,
    "svr" => ThermostatKind::Svr,
};

static STR_TO_BAROSTAT: phf::Map<&'static str, BarostatKind> = phf_map!
{
    "bzp" => BarostatKind::Bzp,
    "mttk" => BarostatKind::Mttk,
};

static STR_TO_FMMODE: phf::Map<&'static str, FmMode> = phf_map!
{
    "physical" => FmMode::Physical,
    "normal" => FmMode::Normal,
};

static STR_TO_TIMETHOD: phf::Map<&'static str, TiMethod> = phf_map!
{
    "msti" => TiMethod::Msti,
    "scti" => TiMethod::Scti,
};

impl Method
{
    pub fn from_str(method: &str) -> Self
    {
        STR_TO_METHOD.get(method).cloned().expect(&error_keyword("method", method))
    }
}

impl Splitting
{
    pub fn from_str(splitting: &str) -> Self
    {
        STR_TO_SPLITTING.get(splitting).cloned().expect(&error_keyword("integrator", splitting))
    }
}

impl Ensemble
{
    pub fn from_str(ensemble: &str) -> Self
    {
        STR_TO_ENSEMBLE.get(ensemble).cloned().expect(&error_keyword("ensemble", ensemble))
    }
}

impl ThermostatKind
{
    pub fn from_str(thermostat: &str) -> Self
    {
        STR_TO_THERMOSTAT.get(thermostat).cloned().expect(&error_keyword("thermostat", thermostat))
    }
}

impl BarostatKind
{
    pub fn from_str(barostat: &str) -> Self
    {
        STR_TO_BAROSTAT.get(barostat).cloned().expect(&error_keyword("barostat", barostat))
    }
}

impl FmMode
{
    pub fn from_str(fmmode: &str) -> Self
    {
        STR_TO_FMMODE.get(fmmode).cloned().expect(&error_keyword("fmmode", fmmode))
    }
}

impl TiMethod
{
    pub fn from_str(timethod: &str) -> Self
    {
        STR_TO_TIMETHOD.get(timethod).cloned().expect(&error_keyword("ti", timethod))
    }
}





/// The structure containing the parameters of the thermodynamic integration.
///
/// # Fields
/// ```
/// method: interpolation method between the full and the reference system
/// lambda: interpolation parameter between 0 and 1
/// ```
#[derive(Clone)]
pub struct TiPara
{
    pub method: TiMethod,
    pub lambda: f64,
}





/// The structure containing all the parameters of the ring-polymer propagator.
///
/// # Fields
/// ```
/// method: propagation method of the ring polymer
/// integrator: operator-splitting ordering of the timestep
/// ensemble: statistical ensemble to be sampled
/// thermostat: stochastic thermostat policy
/// barostat: extended-system barostat formulation
/// fmmode: fictitious-mass mode of the non-centroid normal modes
/// fmass: user scale factor of the fictitious masses
/// temp: target temperature (Unit: K)
/// tau: relaxation time of the centroid thermostat (Unit: fs)
/// tau_p: relaxation time of the barostat (Unit: fs)
/// pext: external target pressure (Unit: Hartree/Bohr^3)
/// pilescale: damping-time scale of the non-centroid PILE modes
/// seed: random seed, offset by the process rank
/// dt: integration timestep (Unit: fs)
/// remove_com: whether to remove the center-of-mass motion of the centroid
/// map_image: whether to unwrap the periodic images around the ring operations
/// ti: the optional thermodynamic-integration parameters
/// ```
#[derive(Clone)]
pub struct PimdPara
{
    pub method: Method,
    pub integrator: Splitting,
    pub ensemble: Ensemble,
    pub thermostat: ThermostatKind,
    pub barostat: BarostatKind,
    pub fmmode: FmMode,
    pub fmass: f64,
    pub temp: f64,
    pub tau: f64,
    pub tau_p: f64,
    pub pext: f64,
    pub pilescale: f64,
    pub seed: u64,
    pub dt: f64,
    pub remove_com: bool,
    pub map_image: bool,
    pub ti: Option<TiPara>,
}





impl PimdPara
{
    pub fn new() -> Self
    {
        PimdPara
        {
            method: Method::NmPimd,
            integrator: Splitting::Obabo,
            ensemble: Ensemble::Nvt,
            thermostat: ThermostatKind::PileL,
            barostat: BarostatKind::Bzp,
            fmmode: FmMode::Physical,
            fmass: 1.0,
            temp: 298.15,
            tau: 10.0,
            tau_p: 100.0,
            pext: 3.4E-9,                // about 1 atm in Hartree/Bohr^3
            pilescale: 1.0,
            seed: 29587,
            dt: 0.5,
            remove_com: true,
            map_image: true,
            ti: None,
        }
    }

    /// Whether the chosen ensemble couples the box volume to a barostat
    pub fn barostatted(&self) -> bool
    {
        match self.ensemble
        {
            Ensemble::Nph | Ensemble::Npt => true,
            Ensemble::Nve | Ensemble::Nvt => false,
        }
    }

    /// Whether the chosen ensemble applies the stochastic thermostat half-steps
    pub fn thermostatted(&self) -> bool
    {
        match self.ensemble
        {
            Ensemble::Nvt | Ensemble::Npt => true,
            Ensemble::Nve | Ensemble::Nph => false,
        }
    }

    /// Check the numeric parameters against their valid domains, which is done
    /// once at construction so that every cooperating process reaches the same
    /// fatal decision before any collective operation
    pub fn validate(&self)
    {
        if self.fmass < 0.0 || self.fmass > 1.0
        {
            panic!("{}", error_out_of_range("fmass", self.fmass));
        }
        if self.temp < 0.0
        {
            panic!("{}", error_out_of_range("temp", self.temp));
        }
        if self.tau_p <= 0.0
        {
            panic!("{}", error_out_of_range("taup", self.tau_p));
        }
        if self.pext < 0.0
        {
            panic!("{}", error_out_of_range("press", self.pext));
        }
        if self.pilescale < 0.0
        {
            panic!("{}", error_out_of_range("scale", self.pilescale));
        }
        if self.dt <= 0.0
        {
            panic!("{}", error_out_of_range("dt", self.dt));
        }
        match &self.ti
        {
            Some(ti) =>
            {
                if ti.lambda < 0.0 || ti.lambda > 1.0
                {
                    panic!("{}", error_out_of_range("lambda", ti.lambda));
                }
            },
            None => (),
        }
    }
}
