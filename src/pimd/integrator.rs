//! About the operator-splitting propagation of the ring polymer.
use crate::common::constants::{FEMTOSECOND_TO_AU, HBAR_AU, KB_AU};
use crate::io::input::{BarostatKind, Method, PimdPara, Splitting, ThermostatKind};
use crate::pimd::barostat::Barostat;
use crate::pimd::estimator::Estimators;
use crate::pimd::exchange::RingExchange;
use crate::pimd::normal_mode::NormalModeTransform;
use crate::pimd::system::BeadSystem;
use crate::pimd::thermostat::{SvrScope, Thermostat};
use crate::pimd::traits::{PathIntegralStepper, RingComm, StepHalf};
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand::rngs::StdRng;





/// The ring-polymer propagator: the state-transition engine advancing one
/// world of the replica ring through the OBABO or BAOAB splitting, calling
/// into the normal-mode transform, the ring exchange, the thermostat, and
/// the barostat in a fixed order each timestep. Everything derived from the
/// static run parameters is computed once at construction; the evolving
/// state is the barostat scalar, the random stream, and the estimators.
///
/// # Fields
/// ```
/// para: the validated run parameters
/// np: the number of beads along the imaginary-time ring
/// iworld: the index of this world (i.e. the normal mode it owns)
/// nm: the normal-mode eigenbasis and fictitious masses
/// exchange: the all-to-all ring exchange and its buffers
/// thermostat: the Langevin friction/noise coefficients
/// barostat: the box-velocity coupling, present for the NPH/NPT ensembles
/// est: the estimator scalars recomputed every step
/// rng: the per-process Gaussian stream, seeded with seed + universe rank
/// dt, dtf, dtv, dtv2, dtv3: the timestep and its halves and powers (Unit: A.U.)
/// kbt, beta, beta_np: the thermal energy and inverse temperatures (Unit: A.U.)
/// omega_np: the ring frequency np/(hbar*beta) (Unit: A.U.)
/// fbond: the ring spring constant omega_np^2 (Unit: A.U.)
/// ```
pub struct RingPolymerPimd
{
    pub para: PimdPara,
    pub np: usize,
    pub iworld: usize,
    pub nm: NormalModeTransform,
    pub exchange: RingExchange,
    pub thermostat: Thermostat,
    pub barostat: Option<Barostat>,
    pub est: Estimators,
    pub rng: StdRng,
    pub dt: f64,
    pub dtf: f64,
    pub dtv: f64,
    pub dtv2: f64,
    pub dtv3: f64,
    pub kbt: f64,
    pub beta: f64,
    pub beta_np: f64,
    pub omega_np: f64,
    pub fbond: f64,
}





impl RingPolymerPimd
{
    /// Validate the parameters and derive every static constant of the run.
    /// An invalid keyword or numeric parameter panics here, identically on
    /// every cooperating process, before any collective has been entered
    ///
    /// # Parameters
    /// ```
    /// para: the run parameters
    /// ring: the ring transport
    /// s: the local partition of this world
    /// ```
    pub fn new<R: RingComm>(para: PimdPara, ring: &R, s: &BeadSystem) -> Self
    {
        para.validate();

        let np: usize = ring.num_worlds();
        let iworld: usize = ring.world_index();

        let dt: f64 = para.dt * FEMTOSECOND_TO_AU;
        let kbt: f64 = KB_AU * para.temp;
        let beta: f64 = 1.0 / kbt;
        let beta_np: f64 = 1.0 / (kbt * np as f64);
        let omega_np: f64 = np as f64 / (HBAR_AU * beta);
        let fbond: f64 = omega_np * omega_np;

        let dtf: f64 = 0.5 * dt;
        let dtv: f64 = 0.5 * dt;
        let dtv2: f64 = dtv * dtv;
        let dtv3: f64 = 1.0 / 3.0 * dtv2 * dtv;

        let tau: f64 = para.tau * FEMTOSECOND_TO_AU;
        let tau_p: f64 = para.tau_p * FEMTOSECOND_TO_AU;

        let nm: NormalModeTransform = NormalModeTransform::new(np, iworld, &para.fmmode, para.fmass, &s.mass, omega_np, dt);
        let thermostat: Thermostat = Thermostat::new(para.thermostat.clone(), &para.integrator, dt, tau, para.pilescale, &nm, omega_np);
        let barostat: Option<Barostat> = match para.barostatted()
        {
            true => Some(Barostat::new(para.barostat.clone(), para.pext, tau_p, np, kbt, s.natoms, s.volume())),
            false => None,
        };
        let exchange: RingExchange = RingExchange::new(ring, s.nlocal);
        let est: Estimators = Estimators::new(s.nlocal, np);
        let rng: StdRng = StdRng::seed_from_u64(para.seed + ring.universe_rank() as u64);

        if ring.universe_rank() == 0
        {
            println!("Initializing the path-integral ring polymer ...");
            println!("Ring spring constant -P/(beta^2*hbar^2) = {:20.7E} (Hartree/Bohr^2)", fbond);
            match para.thermostat
            {
                ThermostatKind::PileL | ThermostatKind::PileG =>
                {
                    println!("Mode       |      omega      |       tau       |       c1       |       c2");
                    for i in 0..np
                    {
                        println!("    {}     {:.8e} {:.8e} {:.8e} {:.8e}", i, nm.omega_k[i], thermostat.tau_k[i], thermostat.c1_k[i], thermostat.c2_k[i]);
                    }
                },
                ThermostatKind::Svr => (),
            }
        }

        RingPolymerPimd
        {
            para,
            np,
            iworld,
            nm,
            exchange,
            thermostat,
            barostat,
            est,
            rng,
            dt,
            dtf,
            dtv,
            dtv2,
            dtv3,
            kbt,
            beta,
            beta_np,
            omega_np,
            fbond,
        }
    }



    /// The force kick: advance the velocities by a half step of the mode
    /// forces, with the fictitious masses
    fn b_step(&self, s: &mut BeadSystem)
    {
        for i in 0..s.nlocal
        {
            let dtfm: f64 = self.dtf / self.nm.mass[s.atom_type[i]];
            s.vel[[i, 0]] += dtfm * s.force[[i, 0]];
            s.vel[[i, 1]] += dtfm * s.force[[i, 1]];
            s.vel[[i, 2]] += dtfm * s.force[[i, 2]];
        }
    }



    /// The free ring rotation: mix position and velocity of this world's
    /// mode by the cosine/sine pair of its natural frequency. The centroid
    /// mode has zero frequency and is propagated by the qc step instead
    fn a_step(&self, s: &mut BeadSystem)
    {
        if self.iworld == 0
        {
            return;
        }

        let c: f64 = self.nm.lan_c[self.iworld];
        let sn: f64 = self.nm.lan_s[self.iworld];
        let omega: f64 = self.nm.omega_k[self.iworld];
        for i in 0..s.nlocal
        {
            let (x0, x1, x2): (f64, f64, f64) = (s.coord[[i, 0]], s.coord[[i, 1]], s.coord[[i, 2]]);
            let (v0, v1, v2): (f64, f64, f64) = (s.vel[[i, 0]], s.vel[[i, 1]], s.vel[[i, 2]]);
            s.coord[[i, 0]] = c * x0 + 1.0 / omega * sn * v0;
            s.coord[[i, 1]] = c * x1 + 1.0 / omega * sn * v1;
            s.coord[[i, 2]] = c * x2 + 1.0 / omega * sn * v2;
            s.vel[[i, 0]] = -omega * sn * x0 + c * v0;
            s.vel[[i, 1]] = -omega * sn * x1 + c * v1;
            s.vel[[i, 2]] = -omega * sn * x2 + c * v2;
        }
    }



    /// The centroid propagation and box rescale. Only world 0 moves its
    /// coordinates; under a barostat the box is rescaled there and then
    /// broadcast so that every world shares one consistent geometry
    fn qc_step<R: RingComm>(&mut self, ring: &R, s: &mut BeadSystem)
    {
        let dtv: f64 = self.dtv;
        match &self.barostat
        {
            None =>
            {
                if self.iworld == 0
                {
                    for i in 0..s.nlocal
                    {
                        s.coord[[i, 0]] += dtv * s.vel[[i, 0]];
                        s.coord[[i, 1]] += dtv * s.vel[[i, 1]];
                        s.coord[[i, 2]] += dtv * s.vel[[i, 2]];
                    }
                }
            },

            Some(barostat) =>
            {
                if self.iworld == 0
                {
                    let expq: f64 = (dtv * barostat.vw).exp();
                    let expp: f64 = (-dtv * barostat.vw).exp();
                    match barostat.kind
                    {
                        BarostatKind::Bzp =>
                        {
                            // The exact drift factor degenerates to dtv in the
                            // vw -> 0 limit
                            let drift: f64 = match barostat.vw != 0.0
                            {
                                true => (expq - expp) / 2.0 / barostat.vw,
                                false => dtv,
                            };
                            for i in 0..s.nlocal
                            {
                                for j in 0..3
                                {
                                    s.coord[[i, j]] = expq * s.coord[[i, j]] + drift * s.vel[[i, j]];
                                    s.vel[[i, j]] = expp * s.vel[[i, j]];
                                }
                            }
                            for j in 0..3
                            {
                                s.box_len[j] *= expq;
                            }
                        },

                        BarostatKind::Mttk =>
                        {
                            let expv: f64 = (-dtv * barostat.vw * (1.0 + 1.0 / (s.natoms as f64) / (self.np as f64))).exp();
                            for i in 0..s.nlocal
                            {
                                for j in 0..3
                                {
                                    s.coord[[i, j]] = expq * s.coord[[i, j]] + dtv * s.vel[[i, j]];
                                    s.vel[[i, j]] = expv * s.vel[[i, j]];
                                }
                            }
                            for j in 0..3
                            {
                                s.box_len[j] *= expq;
                            }
                        },
                    }
                }

                // All worlds converge to the centroid world's box
                ring.barrier();
                let mut box_buf: [f64; 3] = s.box_len;
                ring.broadcast_ring(&mut box_buf);
                s.box_len = box_buf;
            },
        }
    }



    /// Subtract the mass-weighted mean velocity of the centroid world
    fn remove_com_motion<R: RingComm>(&self, ring: &R, s: &mut BeadSystem)
    {
        if self.iworld != 0
        {
            return;
        }

        let mut mass_local: f64 = 0.0;
        let mut p_local: [f64; 3] = [0.0; 3];
        for i in 0..s.nlocal
        {
            let m: f64 = self.nm.mass[s.atom_type[i]];
            mass_local += m;
            p_local[0] += m * s.vel[[i, 0]];
            p_local[1] += m * s.vel[[i, 1]];
            p_local[2] += m * s.vel[[i, 2]];
        }
        let mass_total: f64 = ring.sum_world(mass_local);
        let vcm: [f64; 3] = [ring.sum_world(p_local[0]) / mass_total,
                             ring.sum_world(p_local[1]) / mass_total,
                             ring.sum_world(p_local[2]) / mass_total];
        for i in 0..s.nlocal
        {
            s.vel[[i, 0]] -= vcm[0];
            s.vel[[i, 1]] -= vcm[1];
            s.vel[[i, 2]] -= vcm[2];
        }
    }



    /// The thermostat half-step, dispatching on the selected policy
    fn o_step<R: RingComm>(&mut self, ring: &R, s: &mut BeadSystem)
    {
        match self.para.thermostat
        {
            ThermostatKind::PileL =>
            {
                self.thermostat.pile_step(s, &self.nm, self.iworld, self.beta_np, &mut self.rng);
            },
            ThermostatKind::Svr =>
            {
                self.thermostat.svr_step(ring, s, &self.nm, self.beta_np, &SvrScope::Ring, &mut self.rng);
            },
            ThermostatKind::PileG =>
            {
                if self.iworld == 0
                {
                    self.thermostat.svr_step(ring, s, &self.nm, self.beta_np, &SvrScope::World, &mut self.rng);
                }
                else
                {
                    self.thermostat.pile_step(s, &self.nm, self.iworld, self.beta_np, &mut self.rng);
                }
            },
        }
    }

    /// The barostat velocity step, a no-op without a barostat
    fn press_v_step<R: RingComm>(&mut self, ring: &R, s: &BeadSystem)
    {
        match &mut self.barostat
        {
            Some(barostat) =>
            {
                barostat.press_v_step(ring, s, &self.nm.mass, self.est.p_cv, self.est.p_md, self.est.totke,
                                      self.dtv, self.dtv2, self.dtv3, self.beta_np);
            },
            None => (),
        }
    }

    /// The barostat stochastic refresh, a no-op without a barostat
    fn press_o_step<R: RingComm>(&mut self, ring: &R)
    {
        match &mut self.barostat
        {
            Some(barostat) =>
            {
                barostat.press_o_step(ring, self.thermostat.c1, self.thermostat.c2, self.beta_np, &mut self.rng);
            },
            None => (),
        }
    }



    // Every step that moves positions across worlds is bracketed by a gather
    // and a transform, so that subsequent steps see a consistent ring-wide
    // view; skipping the resynchronization leaves stale bead positions

    fn x_to_modes<R: RingComm>(&mut self, ring: &R, s: &mut BeadSystem)
    {
        ring.barrier();
        self.exchange.gather(ring, s, &s.coord);
        ring.barrier();
        self.nm.to_modes(&self.exchange.buf_beads, &mut s.coord);
    }

    fn x_to_cartesian<R: RingComm>(&mut self, ring: &R, s: &mut BeadSystem)
    {
        ring.barrier();
        self.exchange.gather(ring, s, &s.coord);
        ring.barrier();
        self.nm.to_cartesian(&self.exchange.buf_beads, &mut s.coord);
    }

    fn v_to_modes<R: RingComm>(&mut self, ring: &R, s: &mut BeadSystem)
    {
        ring.barrier();
        self.exchange.gather(ring, s, &s.vel);
        ring.barrier();
        self.nm.to_modes(&self.exchange.buf_beads, &mut s.vel);
    }

    fn f_to_modes<R: RingComm>(&mut self, ring: &R, s: &mut BeadSystem)
    {
        ring.barrier();
        self.exchange.gather(ring, s, &s.force);
        ring.barrier();
        self.nm.to_modes(&self.exchange.buf_beads, &mut s.force);
    }



    /// The first half of the timestep, before the host force evaluation
    fn initial_half<R: RingComm>(&mut self, ring: &R, s: &mut BeadSystem)
    {
        if self.para.map_image
        {
            s.unmap();
        }

        match self.para.integrator
        {
            Splitting::Obabo =>
            {
                if self.para.thermostatted()
                {
                    self.o_step(ring, s);
                    if self.para.remove_com
                    {
                        self.remove_com_motion(ring, s);
                    }
                    if self.para.barostatted()
                    {
                        self.press_o_step(ring);
                    }
                }
                self.compute_totke(ring, s);
                self.compute_p_cv(ring, s);
                if self.para.barostatted()
                {
                    self.press_v_step(ring, s);
                }
                self.b_step(s);
                if self.para.remove_com
                {
                    self.remove_com_motion(ring, s);
                }
                if self.para.method == Method::NmPimd
                {
                    self.x_to_modes(ring, s);
                }
                self.qc_step(ring, s);
                self.a_step(s);
                self.qc_step(ring, s);
                self.a_step(s);
            },

            Splitting::Baoab =>
            {
                if self.para.barostatted()
                {
                    self.press_v_step(ring, s);
                }
                self.b_step(s);
                if self.para.method == Method::NmPimd
                {
                    self.x_to_modes(ring, s);
                }
                self.qc_step(ring, s);
                self.a_step(s);
                if self.para.thermostatted()
                {
                    self.o_step(ring, s);
                    if self.para.remove_com
                    {
                        self.remove_com_motion(ring, s);
                    }
                    if self.para.barostatted()
                    {
                        self.press_o_step(ring);
                    }
                }
                self.qc_step(ring, s);
                self.a_step(s);
            },
        }

        self.compute_spring_energy(ring, s);
        if self.para.method == Method::NmPimd
        {
            self.x_to_cartesian(ring, s);
        }

        if self.para.map_image
        {
            s.unmap_inv();
        }
    }



    /// The second half of the timestep, after the host force evaluation
    fn final_half<R: RingComm>(&mut self, ring: &R, s: &mut BeadSystem)
    {
        if self.para.barostatted()
        {
            self.compute_totke(ring, s);
            self.compute_p_cv(ring, s);
            self.press_v_step(ring, s);
        }
        self.b_step(s);
        if self.para.remove_com
        {
            self.remove_com_motion(ring, s);
        }

        match self.para.integrator
        {
            Splitting::Obabo =>
            {
                if self.para.thermostatted()
                {
                    self.o_step(ring, s);
                    if self.para.remove_com
                    {
                        self.remove_com_motion(ring, s);
                    }
                    if self.para.barostatted()
                    {
                        self.press_o_step(ring);
                    }
                }
            },
            Splitting::Baoab => (),
        }
    }
}





impl PathIntegralStepper for RingPolymerPimd
{
    /// Prime the propagator from the host state after the first force
    /// evaluation: move the velocities into the mode representation, where
    /// they stay for the whole run, and fill every estimator once
    fn setup<R: RingComm>(&mut self, ring: &R, s: &mut BeadSystem)
    {
        if self.para.map_image
        {
            s.unmap();
        }
        if self.para.method == Method::NmPimd
        {
            self.x_to_modes(ring, s);
        }
        self.compute_spring_energy(ring, s);
        if self.para.method == Method::NmPimd
        {
            self.x_to_cartesian(ring, s);
            self.v_to_modes(ring, s);
        }
        self.compute_xc(ring, s);
        self.update_x_unwrap(s);
        if self.para.map_image
        {
            s.unmap_inv();
        }

        self.after_force(ring, s);
        self.compute_totke(ring, s);
        self.compute_pote(ring, s);
        self.end_of_step(ring, s);
    }



    fn integrate_half<R: RingComm>(&mut self, ring: &R, s: &mut BeadSystem, half: StepHalf)
    {
        match half
        {
            StepHalf::Initial => self.initial_half(ring, s),
            StepHalf::Final => self.final_half(ring, s),
        }
    }



    /// Consume the freshly evaluated host forces: refresh the unwrapped and
    /// centroid coordinates, reduce the virials and the potential energy,
    /// and move the forces into the mode representation
    fn after_force<R: RingComm>(&mut self, ring: &R, s: &mut BeadSystem)
    {
        if self.para.map_image
        {
            s.unmap();
        }
        ring.barrier();
        self.update_x_unwrap(s);
        ring.barrier();
        self.compute_xc(ring, s);
        if self.para.map_image
        {
            s.unmap_inv();
        }

        self.compute_vir(ring, s);
        self.compute_atom_vir(ring, s);
        self.compute_t_prim(s);
        self.compute_t_vir(s);
        self.compute_pote(ring, s);
        if self.para.ti.is_some()
        {
            self.compute_xscaled(s);
        }

        if self.para.method == Method::NmPimd
        {
            self.f_to_modes(ring, s);
        }
    }



    /// Close the step: refresh the kinetic energy, the pressure estimators,
    /// the total energy, and the enthalpy if barostatted
    fn end_of_step<R: RingComm>(&mut self, ring: &R, s: &mut BeadSystem)
    {
        self.compute_totke(ring, s);
        self.compute_p_prim(s);
        self.compute_p_cv(ring, s);
        self.compute_tote();
        if self.para.barostatted()
        {
            self.compute_totenthalpy(s);
        }
    }
}










#[cfg(test)]
mod tests
{
    use super::*;
    use crate::io::input::Ensemble;
    use crate::pimd::channel::ChannelRing;
    use ndarray::{array, Array2};
    use std::thread;

    // The host side of the tests: a harmonic external potential evaluated
    // for the current bead positions
    fn harmonic_force(s: &mut BeadSystem, k: f64)
    {
        s.pot = 0.0;
        for i in 0..s.nlocal
        {
            for j in 0..3
            {
                s.force[[i, j]] = -k * s.coord[[i, j]];
                s.pot += 0.5 * k * s.coord[[i, j]] * s.coord[[i, j]];
            }
        }
        let volume: f64 = s.volume();
        for j in 0..3
        {
            s.press[j] = s.pot / 3.0 / volume;
            s.press[3 + j] = 0.0;
        }
    }

    fn run_trajectory(seed: u64, ensemble: Ensemble, integrator: Splitting, nstep: usize) -> Vec<Vec<f64>>
    {
        let np: usize = 2;
        let rings: Vec<ChannelRing> = ChannelRing::create(np);
        let handles: Vec<thread::JoinHandle<Vec<f64>>> = rings.into_iter().map(|ring|
        {
            let ensemble: Ensemble = ensemble.clone();
            let integrator: Splitting = integrator.clone();
            thread::spawn(move ||
            {
                let iworld: usize = ring.world_index();
                let coord: Array2<f64> = array![[0.10 + 0.05 * iworld as f64, -0.20, 0.05],
                                                [-0.15, 0.25, 0.10 * iworld as f64]];
                let vel: Array2<f64> = Array2::zeros((2, 3));
                let mut s: BeadSystem = BeadSystem::new(2, vec![1, 2], vec![0, 0], vec![1836.0], coord, vel, [30.0, 30.0, 30.0]);

                let mut para: PimdPara = PimdPara::new();
                para.seed = seed;
                para.ensemble = ensemble;
                para.integrator = integrator;
                para.remove_com = false;
                para.map_image = false;
                let mut prop: RingPolymerPimd = RingPolymerPimd::new(para, &ring, &s);

                let k: f64 = 0.02;
                harmonic_force(&mut s, k);
                prop.setup(&ring, &mut s);
                for _ in 0..nstep
                {
                    prop.integrate_half(&ring, &mut s, StepHalf::Initial);
                    harmonic_force(&mut s, k);
                    prop.after_force(&ring, &mut s);
                    prop.integrate_half(&ring, &mut s, StepHalf::Final);
                    prop.end_of_step(&ring, &mut s);
                }

                let mut out: Vec<f64> = s.coord.iter().cloned().collect();
                out.extend(s.vel.iter().cloned());
                out.extend(prop.diagnostics().iter().cloned());
                out
            })
        }).collect();

        handles.into_iter().map(|handle| handle.join().expect("a ring world panicked")).collect()
    }

    #[test]
    fn seeded_nvt_trajectories_are_bitwise_identical()
    {
        let first: Vec<Vec<f64>> = run_trajectory(77, crate::io::input::Ensemble::Nvt, Splitting::Obabo, 12);
        let second: Vec<Vec<f64>> = run_trajectory(77, crate::io::input::Ensemble::Nvt, Splitting::Obabo, 12);
        assert_eq!(first, second);

        // And the thermostat noise really entered the run
        let quiet: Vec<Vec<f64>> = run_trajectory(78, crate::io::input::Ensemble::Nvt, Splitting::Obabo, 12);
        assert_ne!(first, quiet);
    }

    #[test]
    fn baoab_splitting_propagates_and_stays_deterministic()
    {
        let first: Vec<Vec<f64>> = run_trajectory(41, crate::io::input::Ensemble::Nvt, Splitting::Baoab, 12);
        let second: Vec<Vec<f64>> = run_trajectory(41, crate::io::input::Ensemble::Nvt, Splitting::Baoab, 12);
        assert_eq!(first, second);
        for world in &first
        {
            for value in world
            {
                assert!(value.is_finite());
            }
        }
    }

    #[test]
    fn nve_run_keeps_every_diagnostic_finite()
    {
        let out: Vec<Vec<f64>> = run_trajectory(5, crate::io::input::Ensemble::Nve, Splitting::Obabo, 20);
        for world in &out
        {
            for value in world
            {
                assert!(value.is_finite());
            }
        }
        // Both worlds agree on the broadcast centroid-virial pressure
        let ndiag: usize = 13;
        let p_cv_0: f64 = out[0][out[0].len() - ndiag + 9];
        let p_cv_1: f64 = out[1][out[1].len() - ndiag + 9];
        assert_eq!(p_cv_0, p_cv_1);
    }

    #[test]
    fn npt_run_rescales_a_consistent_box()
    {
        let np: usize = 2;
        let rings: Vec<ChannelRing> = ChannelRing::create(np);
        let handles: Vec<thread::JoinHandle<[f64; 3]>> = rings.into_iter().map(|ring| thread::spawn(move ||
        {
            let iworld: usize = ring.world_index();
            let coord: Array2<f64> = array![[0.10 + 0.05 * iworld as f64, -0.20, 0.05],
                                            [-0.15, 0.25, 0.10 * iworld as f64]];
            let vel: Array2<f64> = Array2::zeros((2, 3));
            let mut s: BeadSystem = BeadSystem::new(2, vec![1, 2], vec![0, 0], vec![1836.0], coord, vel, [30.0, 30.0, 30.0]);

            let mut para: PimdPara = PimdPara::new();
            para.seed = 11;
            para.ensemble = crate::io::input::Ensemble::Npt;
            para.remove_com = false;
            para.map_image = false;
            let mut prop: RingPolymerPimd = RingPolymerPimd::new(para, &ring, &s);

            harmonic_force(&mut s, 0.02);
            prop.setup(&ring, &mut s);
            for _ in 0..8
            {
                prop.integrate_half(&ring, &mut s, StepHalf::Initial);
                harmonic_force(&mut s, 0.02);
                prop.after_force(&ring, &mut s);
                prop.integrate_half(&ring, &mut s, StepHalf::Final);
                prop.end_of_step(&ring, &mut s);
            }
            assert!(prop.diagnostics()[12].is_finite());
            s.box_len
        })).collect();

        let boxes: Vec<[f64; 3]> = handles.into_iter().map(|handle| handle.join().expect("a ring world panicked")).collect();
        // Every world ends on the same rescaled box
        assert_eq!(boxes[0], boxes[1]);
        assert_ne!(boxes[0], [30.0, 30.0, 30.0]);
    }
}




