//! About the extended-system barostat coupling the box volume to the pressure.
use crate::io::input::BarostatKind;
use crate::pimd::system::BeadSystem;
use crate::pimd::traits::RingComm;
use ndarray_rand::rand::Rng;
use ndarray_rand::rand::rngs::StdRng;
use ndarray_rand::rand_distr::StandardNormal;





/// The extended-system barostat: one box-velocity scalar vw evolving against
/// a fixed inertial mass, synchronized ring-wide after every advance so that
/// all replicas share one consistent box.
///
/// # Fields
/// ```
/// kind: the barostat formulation selected for the run
/// pext: the external target pressure (Unit: Hartree/Bohr^3)
/// vw: the box velocity, the only evolving degree of freedom (Unit: A.U.)
/// w: the barostat inertial mass 3*N*tau_p^2*np*kB*T
/// vcoeff: the coefficient of the entropic volume force
/// vol0: the box volume at initialization, the MTTK enthalpy reference
/// ```
pub struct Barostat
{
    pub kind: BarostatKind,
    pub pext: f64,
    pub vw: f64,
    pub w: f64,
    pub vcoeff: f64,
    pub vol0: f64,
}





impl Barostat
{
    pub fn new(kind: BarostatKind, pext: f64, tau_p: f64, np: usize, kbt: f64, natoms: usize, vol0: f64) -> Self
    {
        let w: f64 = 3.0 * (natoms as f64) * tau_p * tau_p * (np as f64) * kbt;

        Barostat
        {
            kind,
            pext,
            vw: 0.0,
            w,
            vcoeff: 1.0,
            vol0,
        }
    }



    /// Advance the box velocity by the pressure imbalance. Under BZP the
    /// additional force-dependent increment is accumulated by world 0 only
    /// and the result is broadcast so that vw stays synchronized ring-wide
    ///
    /// # Parameters
    /// ```
    /// fict_mass: the fictitious mass table of this world
    /// p_cv: the centroid-virial pressure estimator (Unit: Hartree/Bohr^3)
    /// p_md: the bead pressure estimator used by MTTK (Unit: Hartree/Bohr^3)
    /// totke: the total ring kinetic energy used by the MTTK correction term
    /// ```
    pub fn press_v_step<R: RingComm>(&mut self, ring: &R, s: &BeadSystem, fict_mass: &[f64], p_cv: f64, p_md: f64, totke: f64,
                                     dtv: f64, dtv2: f64, dtv3: f64, beta_np: f64)
    {
        let np: f64 = ring.num_worlds() as f64;
        let volume: f64 = s.volume();

        match self.kind
        {
            BarostatKind::Bzp =>
            {
                self.vw += dtv * 3.0 * (volume * np * (p_cv - self.pext) + self.vcoeff / beta_np) / self.w;
                if ring.world_index() == 0
                {
                    let mut dvw_proc: f64 = 0.0;
                    for i in 0..s.nlocal
                    {
                        for j in 0..3
                        {
                            dvw_proc += dtv2 * s.force[[i, j]] * s.vel[[i, j]] / self.w
                                      + dtv3 * s.force[[i, j]] * s.force[[i, j]] / fict_mass[s.atom_type[i]] / self.w;
                        }
                    }
                    let dvw: f64 = ring.sum_world(dvw_proc);
                    self.vw += dvw;
                }
                ring.barrier();
                let mut vw_buf: [f64; 1] = [self.vw];
                ring.broadcast_ring(&mut vw_buf);
                self.vw = vw_buf[0];
            },

            BarostatKind::Mttk =>
            {
                let mtk_term: f64 = 2.0 * totke / (3.0 * s.natoms as f64);
                let f_omega: f64 = (volume * np * (p_md - self.pext) + mtk_term) / self.w;
                self.vw += 0.5 * dtv * f_omega;
            },
        }
    }



    /// The stochastic refresh of the box velocity, drawn by the universe root
    /// with the centroid friction pair and broadcast ring-wide
    pub fn press_o_step<R: RingComm>(&mut self, ring: &R, c1: f64, c2: f64, beta_np: f64, rng: &mut StdRng)
    {
        if ring.universe_rank() == 0
        {
            let r1: f64 = rng.sample(StandardNormal);
            self.vw = c1 * self.vw + c2 * (1.0 / self.w / beta_np).sqrt() * r1;
        }
        ring.barrier();
        let mut vw_buf: [f64; 1] = [self.vw];
        ring.broadcast_ring(&mut vw_buf);
        self.vw = vw_buf[0];
    }
}










#[cfg(test)]
mod tests
{
    use super::*;
    use crate::pimd::channel::ChannelRing;
    use ndarray::Array2;
    use std::thread;

    fn resting_system(natom: usize) -> BeadSystem
    {
        let coord: Array2<f64> = Array2::zeros((natom, 3));
        let vel: Array2<f64> = Array2::zeros((natom, 3));
        let tags: Vec<i64> = (1..=natom as i64).collect();
        BeadSystem::new(natom, tags, vec![0; natom], vec![1836.0], coord, vel, [20.0, 20.0, 20.0])
    }

    #[test]
    fn balanced_bzp_box_velocity_stays_at_rest()
    {
        // With the pressure imbalance exactly cancelling the entropic volume
        // force, zero forces, and no stochastic refresh, vw must not drift
        let rings: Vec<ChannelRing> = ChannelRing::create(1);
        let handles: Vec<thread::JoinHandle<()>> = rings.into_iter().map(|ring| thread::spawn(move ||
        {
            let s: BeadSystem = resting_system(8);
            let beta_np: f64 = 1.0 / 0.00095;
            let p_cv: f64 = 0.0000034;
            let pext: f64 = p_cv + 1.0 / (beta_np * s.volume() * 1.0);
            let mut barostat: Barostat = Barostat::new(BarostatKind::Bzp, pext, 4000.0, 1, 0.00095, 8, s.volume());
            for _ in 0..50
            {
                barostat.press_v_step(&ring, &s, &[1836.0], p_cv, 0.0, 0.0, 10.0, 100.0, 1000.0, beta_np);
                assert!(barostat.vw.abs() < 1.0e-18, "vw drifted to {}", barostat.vw);
            }
        })).collect();

        for handle in handles
        {
            handle.join().expect("a ring world panicked");
        }
    }

    #[test]
    fn balanced_mttk_box_velocity_stays_at_rest()
    {
        // With p_md equal to the target pressure and zero kinetic energy the
        // MTTK box velocity has no force at all
        let rings: Vec<ChannelRing> = ChannelRing::create(1);
        let handles: Vec<thread::JoinHandle<()>> = rings.into_iter().map(|ring| thread::spawn(move ||
        {
            let s: BeadSystem = resting_system(8);
            let pext: f64 = 0.0000034;
            let mut barostat: Barostat = Barostat::new(BarostatKind::Mttk, pext, 4000.0, 1, 0.00095, 8, s.volume());
            for _ in 0..50
            {
                barostat.press_v_step(&ring, &s, &[1836.0], 0.0, pext, 0.0, 10.0, 100.0, 1000.0, 1.0 / 0.00095);
                assert!(barostat.vw.abs() < 1.0e-18);
            }
        })).collect();

        for handle in handles
        {
            handle.join().expect("a ring world panicked");
        }
    }

    #[test]
    fn stochastic_refresh_is_bounded_by_the_friction_pair()
    {
        use ndarray_rand::rand::SeedableRng;

        let rings: Vec<ChannelRing> = ChannelRing::create(1);
        let handles: Vec<thread::JoinHandle<()>> = rings.into_iter().map(|ring| thread::spawn(move ||
        {
            let mut barostat: Barostat = Barostat::new(BarostatKind::Bzp, 0.0000034, 4000.0, 1, 0.00095, 8, 8000.0);
            let mut rng: StdRng = StdRng::seed_from_u64(4711);
            // In the full-resampling limit c1 = 0 the refresh draws vw fresh
            // from the 1/(W*beta_np) Gaussian every time
            let sigma: f64 = (1.0 / barostat.w / (1.0 / 0.00095)).sqrt();
            for _ in 0..200
            {
                barostat.press_o_step(&ring, 0.0, 1.0, 1.0 / 0.00095, &mut rng);
                assert!(barostat.vw.abs() < 8.0 * sigma);
            }
        })).collect();

        for handle in handles
        {
            handle.join().expect("a ring world panicked");
        }
    }
}




