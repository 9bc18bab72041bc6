//! About the stochastic thermostats applied in the O half-steps.
use crate::io::input::{Splitting, ThermostatKind};
use crate::pimd::normal_mode::NormalModeTransform;
use crate::pimd::system::BeadSystem;
use crate::pimd::traits::RingComm;
use ndarray_rand::rand::Rng;
use ndarray_rand::rand::rngs::StdRng;
use ndarray_rand::rand_distr::StandardNormal;





/// Which group of processes a stochastic velocity rescaling acts on: the
/// whole ring (the SVR policy) or one world (the centroid group of PILE-global).
#[derive(Clone, Debug, PartialEq)]
pub enum SvrScope
{
    Ring,
    World,
}





/// The friction and noise coefficients of the path-integral Langevin
/// thermostats, derived once from the timestep, the relaxation times, and
/// the normal-mode frequencies, and immutable afterwards.
///
/// # Fields
/// ```
/// kind: the thermostat policy selected for the run
/// gamma: the friction of the centroid mode, 1/tau (Unit: A.U.)
/// c1: exp(-gamma*dt/2) under OBABO, exp(-gamma*dt) under BAOAB
/// c2: sqrt(1 - c1^2), the noise amplitude paired with c1
/// tau_k: the damping time of each normal mode (np Vec, Unit: A.U.)
/// c1_k: the friction factor of each normal mode
/// c2_k: the noise factor of each normal mode
/// ```
pub struct Thermostat
{
    pub kind: ThermostatKind,
    pub gamma: f64,
    pub c1: f64,
    pub c2: f64,
    pub tau_k: Vec<f64>,
    pub c1_k: Vec<f64>,
    pub c2_k: Vec<f64>,
}





impl Thermostat
{
    /// Derive the friction pairs of every normal mode. The centroid mode uses
    /// the user relaxation time tau; mode k>0 uses 1/(2*pilescale*omega_k)
    ///
    /// # Parameters
    /// ```
    /// kind: the thermostat policy
    /// integrator: the operator splitting, which fixes the half- or full-step friction
    /// dt: the integration timestep (Unit: A.U.)
    /// tau: the centroid relaxation time (Unit: A.U.)
    /// pilescale: the damping-time scale of the non-centroid modes
    /// nm: the normal-mode transform providing the mode frequencies
    /// omega_np: the ring frequency, the friction fallback for tau <= 0
    /// ```
    pub fn new(kind: ThermostatKind, integrator: &Splitting, dt: f64, tau: f64, pilescale: f64, nm: &NormalModeTransform, omega_np: f64) -> Self
    {
        let gamma: f64 = if tau > 0.0 { 1.0 / tau } else { omega_np };
        let c1: f64 = match integrator
        {
            Splitting::Obabo => (-gamma * 0.5 * dt).exp(),
            Splitting::Baoab => (-gamma * dt).exp(),
        };
        let c2: f64 = (1.0 - c1 * c1).sqrt();

        let np: usize = nm.np;
        let mut tau_k: Vec<f64> = vec![0.0; np];
        let mut c1_k: Vec<f64> = vec![0.0; np];
        let mut c2_k: Vec<f64> = vec![0.0; np];
        tau_k[0] = tau;
        c1_k[0] = c1;
        c2_k[0] = c2;
        for i in 1..np
        {
            tau_k[i] = 0.5 / pilescale / nm.omega_k[i];
            c1_k[i] = match integrator
            {
                Splitting::Obabo => (-0.5 * dt / tau_k[i]).exp(),
                Splitting::Baoab => (-dt / tau_k[i]).exp(),
            };
            c2_k[i] = (1.0 - c1_k[i] * c1_k[i]).sqrt();
        }

        Thermostat
        {
            kind,
            gamma,
            c1,
            c2,
            tau_k,
            c1_k,
            c2_k,
        }
    }



    /// The local-mode Langevin kick: every Cartesian component of every atom
    /// receives an independent Gaussian draw, with the noise amplitude set by
    /// the fictitious mass of this world's mode
    pub fn pile_step(&self, s: &mut BeadSystem, nm: &NormalModeTransform, iworld: usize, beta_np: f64, rng: &mut StdRng)
    {
        for i in 0..s.nlocal
        {
            let amp: f64 = (1.0 / (nm.mass[s.atom_type[i]] * beta_np)).sqrt();
            let r1: f64 = rng.sample(StandardNormal);
            let r2: f64 = rng.sample(StandardNormal);
            let r3: f64 = rng.sample(StandardNormal);
            s.vel[[i, 0]] = self.c1_k[iworld] * s.vel[[i, 0]] + self.c2_k[iworld] * amp * r1;
            s.vel[[i, 1]] = self.c1_k[iworld] * s.vel[[i, 1]] + self.c2_k[iworld] * amp * r2;
            s.vel[[i, 2]] = self.c1_k[iworld] * s.vel[[i, 2]] + self.c2_k[iworld] * amp * r3;
        }
    }



    /// The stochastic velocity rescaling: one collective factor alpha scales
    /// every velocity of the scope group, computed on the scope root from the
    /// group kinetic energy and the summed Gaussian noise, then broadcast
    pub fn svr_step<R: RingComm>(&self, ring: &R, s: &mut BeadSystem, nm: &NormalModeTransform, beta_np: f64, scope: &SvrScope, rng: &mut StdRng)
    {
        // The kinetic energy of the scope group
        let mut ke_local: f64 = 0.0;
        for i in 0..s.nlocal
        {
            for j in 0..3
            {
                ke_local += 0.5 * nm.mass[s.atom_type[i]] * s.vel[[i, j]] * s.vel[[i, j]];
            }
        }
        let ke_total: f64 = match scope
        {
            SvrScope::Ring => ring.sum_ring(ke_local),
            SvrScope::World => ring.sum_world(ke_local),
        };

        // The Gaussian noise terms; the first draw of the first process is
        // reserved as the linear term ksi0
        let mut noise_local: f64 = 0.0;
        let mut ksi0: f64 = 0.0;
        for i in 0..s.natoms
        {
            for j in 0..3
            {
                let ksi: f64 = rng.sample(StandardNormal);
                if i == 0 && j == 0 && ring.world_index() == 0
                {
                    ksi0 = ksi;
                }
                noise_local += ksi * ksi;
            }
        }
        let noise_total: f64 = match scope
        {
            SvrScope::Ring => ring.sum_ring(noise_local),
            SvrScope::World => ring.sum_world(noise_local),
        };

        // Solve for alpha on the scope root, taking the sign from the shifted
        // linear noise term
        let mut alpha: [f64; 1] = [0.0];
        if ring.universe_rank() == 0
        {
            let alpha2: f64 = self.c1 + (1.0 - self.c1) * noise_total / (2.0 * beta_np * ke_total)
                            + 2.0 * ksi0 * (self.c1 * (1.0 - self.c1) / (2.0 * beta_np * ke_total)).sqrt();
            let shifted: f64 = ksi0 + (2.0 * beta_np * ke_total * self.c1 / (1.0 - self.c1)).sqrt();
            let sgn: f64 = if shifted < 0.0 { -1.0 } else { 1.0 };
            alpha[0] = sgn * alpha2.sqrt();
        }
        match scope
        {
            SvrScope::Ring => ring.broadcast_ring(&mut alpha),
            SvrScope::World => ring.broadcast_world(&mut alpha),
        }

        // Scale every velocity of the group by the same factor
        for i in 0..s.nlocal
        {
            for j in 0..3
            {
                s.vel[[i, j]] *= alpha[0];
            }
        }
    }
}










#[cfg(test)]
mod tests
{
    use super::*;
    use crate::io::input::FmMode;
    use crate::common::constants::KB_AU;
    use ndarray::Array2;
    use ndarray_rand::rand::SeedableRng;

    #[test]
    fn pile_kick_converges_to_the_target_temperature()
    {
        // A single force-free world of independent particles: the stationary
        // kinetic energy per degree of freedom must reach kB*T/2
        let natom: usize = 300;
        let mass: f64 = 1836.0;
        let temp: f64 = 300.0;
        let kbt: f64 = KB_AU * temp;
        let beta_np: f64 = 1.0 / kbt;
        let dt: f64 = 20.0;
        let tau: f64 = 20.0;
        let omega_np: f64 = kbt;

        let nm: NormalModeTransform = NormalModeTransform::new(1, 0, &FmMode::Physical, 1.0, &[mass], omega_np, dt);
        let thermostat: Thermostat = Thermostat::new(ThermostatKind::PileL, &Splitting::Obabo, dt, tau, 1.0, &nm, omega_np);

        let coord: Array2<f64> = Array2::zeros((natom, 3));
        let vel: Array2<f64> = Array2::zeros((natom, 3));
        let tags: Vec<i64> = (1..=natom as i64).collect();
        let mut s: BeadSystem = BeadSystem::new(natom, tags, vec![0; natom], vec![mass], coord, vel, [10.0, 10.0, 10.0]);

        let mut rng: StdRng = StdRng::seed_from_u64(90210);
        let nstep: usize = 3000;
        let nburn: usize = 500;
        let mut ke_mean: f64 = 0.0;
        for step in 0..nstep
        {
            thermostat.pile_step(&mut s, &nm, 0, beta_np, &mut rng);
            if step >= nburn
            {
                let mut ke: f64 = 0.0;
                for i in 0..natom
                {
                    for j in 0..3
                    {
                        ke += 0.5 * mass * s.vel[[i, j]] * s.vel[[i, j]];
                    }
                }
                ke_mean += ke / ((natom * 3) as f64);
            }
        }
        ke_mean /= (nstep - nburn) as f64;

        let target: f64 = 0.5 * kbt;
        assert!((ke_mean - target).abs() / target < 0.03, "ke per dof = {}, target = {}", ke_mean, target);
    }

    #[test]
    fn friction_pairs_satisfy_the_fluctuation_relation()
    {
        let dt: f64 = 20.0;
        let omega_np: f64 = 0.01;
        let nm: NormalModeTransform = NormalModeTransform::new(4, 1, &FmMode::Physical, 1.0, &[1836.0], omega_np, dt);
        let thermostat: Thermostat = Thermostat::new(ThermostatKind::PileL, &Splitting::Obabo, dt, 100.0, 1.0, &nm, omega_np);
        for k in 0..4
        {
            let c1: f64 = thermostat.c1_k[k];
            let c2: f64 = thermostat.c2_k[k];
            assert!((c1 * c1 + c2 * c2 - 1.0).abs() < 1.0e-12);
        }
        // A stiffer mode damps faster than the centroid
        assert!(thermostat.tau_k[1] < thermostat.tau_k[0]);
    }
}




