//! About the kinetic, pressure, and energy estimators of the ring polymer.
use crate::io::input::BarostatKind;
use crate::pimd::integrator::RingPolymerPimd;
use crate::pimd::system::BeadSystem;
use crate::pimd::traits::RingComm;
use ndarray::Array1;





/// The estimator scalars recomputed every step from the current bead data,
/// and the centroid/unwrapped coordinate buffers they are derived from.
/// Nothing here is incremented across steps; the spring energy in particular
/// is fully rebuilt on every call.
///
/// # Fields
/// ```
/// ke_bead: the kinetic energy of this world (Unit: Hartree)
/// totke: the ring kinetic energy per bead (Unit: Hartree)
/// se_bead: the spring energy of this world (Unit: Hartree)
/// total_spring_energy: the ring spring energy per bead (Unit: Hartree)
/// pe_bead: the potential energy of this world, from the host (Unit: Hartree)
/// pote: the ring potential energy per bead (Unit: Hartree)
/// t_prim: the primitive kinetic-energy estimator (Unit: Hartree)
/// t_vir: the bare virial kinetic-energy estimator (Unit: Hartree)
/// t_cv: the centroid-virial kinetic-energy estimator (Unit: Hartree)
/// p_prim: the primitive pressure estimator (Unit: Hartree/Bohr^3)
/// p_md: the bead pressure estimator used by MTTK (Unit: Hartree/Bohr^3)
/// p_cv: the centroid-virial pressure estimator (Unit: Hartree/Bohr^3)
/// vir: the ring virial from the host pressure tensor (Unit: Hartree)
/// atom_vir: the ring sum of x.f over the unwrapped coordinates (Unit: Hartree)
/// centroid_vir: the ring sum of (x-xc).f (Unit: Hartree)
/// tote: the conserved total energy per bead (Unit: Hartree)
/// totenthalpy: the conserved enthalpy under a barostat (Unit: Hartree)
/// xc: the centroid coordinates of the local atoms (3*nlocal Vec)
/// x_unwrap: the unwrapped coordinates of the local atoms (3*nlocal Vec)
/// x_scaled: the lambda-interpolated coordinates of every world, rebuilt for
///           the host's thermodynamic-integration force evaluation
/// ```
pub struct Estimators
{
    pub ke_bead: f64,
    pub totke: f64,
    pub se_bead: f64,
    pub total_spring_energy: f64,
    pub pe_bead: f64,
    pub pote: f64,
    pub t_prim: f64,
    pub t_vir: f64,
    pub t_cv: f64,
    pub p_prim: f64,
    pub p_md: f64,
    pub p_cv: f64,
    pub vir: f64,
    pub atom_vir: f64,
    pub centroid_vir: f64,
    pub tote: f64,
    pub totenthalpy: f64,
    pub xc: Vec<f64>,
    pub x_unwrap: Vec<f64>,
    pub x_scaled: Vec<Vec<f64>>,
}





impl Estimators
{
    pub fn new(nlocal: usize, np: usize) -> Self
    {
        Estimators
        {
            ke_bead: 0.0,
            totke: 0.0,
            se_bead: 0.0,
            total_spring_energy: 0.0,
            pe_bead: 0.0,
            pote: 0.0,
            t_prim: 0.0,
            t_vir: 0.0,
            t_cv: 0.0,
            p_prim: 0.0,
            p_md: 0.0,
            p_cv: 0.0,
            vir: 0.0,
            atom_vir: 0.0,
            centroid_vir: 0.0,
            tote: 0.0,
            totenthalpy: 0.0,
            xc: vec![0.0; 3*nlocal],
            x_unwrap: vec![0.0; 3*nlocal],
            x_scaled: vec![vec![0.0; 3*nlocal]; np],
        }
    }
}





impl RingPolymerPimd
{
    /// Refresh the unwrapped coordinate copy used by the virial estimators
    pub fn update_x_unwrap(&mut self, s: &BeadSystem)
    {
        self.est.x_unwrap.resize(3*s.nlocal, 0.0);
        for i in 0..s.nlocal
        {
            for j in 0..3
            {
                self.est.x_unwrap[3*i + j] = s.coord[[i, j]];
            }
        }
    }



    /// Gather the positions across the ring and average them into the
    /// centroid coordinates of every local atom
    pub fn compute_xc<R: RingComm>(&mut self, ring: &R, s: &BeadSystem)
    {
        self.exchange.gather(ring, s, &s.coord);
        ring.barrier();
        self.est.xc.resize(3*s.nlocal, 0.0);
        for i in 0..3*s.nlocal
        {
            self.est.xc[i] = 0.0;
            for j in 0..self.np
            {
                self.est.xc[i] += self.exchange.buf_beads[j][i];
            }
            self.est.xc[i] /= self.np as f64;
        }
    }



    /// Kinetic energy of this world and of the whole ring, with the
    /// fictitious masses of the propagated modes
    pub fn compute_totke<R: RingComm>(&mut self, ring: &R, s: &BeadSystem)
    {
        let mut kine: f64 = 0.0;
        for i in 0..s.nlocal
        {
            for j in 0..3
            {
                kine += 0.5 * self.nm.mass[s.atom_type[i]] * s.vel[[i, j]] * s.vel[[i, j]];
            }
        }
        ring.barrier();
        self.est.ke_bead = ring.sum_world(kine);
        self.est.totke = ring.sum_ring(kine) / (self.np as f64);
    }



    /// The harmonic ring-coupling energy, fully recomputed from the current
    /// mode coordinates: 0.5 * m * fbond * lam[world] * |x|^2 per atom, with
    /// the physical masses
    pub fn compute_spring_energy<R: RingComm>(&mut self, ring: &R, s: &BeadSystem)
    {
        let mut spring: f64 = 0.0;
        let lam_world: f64 = self.nm.lam[self.iworld];
        for i in 0..s.nlocal
        {
            spring += 0.5 * s.mass[s.atom_type[i]] * self.fbond * lam_world
                    * (s.coord[[i, 0]]*s.coord[[i, 0]] + s.coord[[i, 1]]*s.coord[[i, 1]] + s.coord[[i, 2]]*s.coord[[i, 2]]);
        }
        ring.barrier();
        self.est.se_bead = ring.sum_world(spring);
        self.est.total_spring_energy = ring.sum_ring(spring) / (self.np as f64);
    }



    /// The ring potential energy per bead, from the host scalar of each world
    pub fn compute_pote<R: RingComm>(&mut self, ring: &R, s: &BeadSystem)
    {
        self.est.pe_bead = s.pot;
        let partition: f64 = s.pot / (ring.procs_per_world() as f64);
        ring.barrier();
        self.est.pote = ring.sum_ring(partition) / (self.np as f64);
    }



    /// The ring virial from the trace of the host pressure tensor
    pub fn compute_vir<R: RingComm>(&mut self, ring: &R, s: &BeadSystem)
    {
        let volume: f64 = s.volume();
        let mut vir: f64 = (s.press[0] + s.press[1] + s.press[2]) * volume;
        vir /= ring.procs_per_world() as f64;
        ring.barrier();
        self.est.vir = ring.sum_ring(vir);
    }



    /// The per-atom virials over the unwrapped coordinates: the bare sum x.f
    /// and the centroid-referenced sum (x-xc).f, reduced over the whole ring
    pub fn compute_atom_vir<R: RingComm>(&mut self, ring: &R, s: &BeadSystem)
    {
        ring.barrier();
        let mut xf: f64 = 0.0;
        let mut xcf: f64 = 0.0;
        for i in 0..s.nlocal
        {
            for j in 0..3
            {
                xf += self.est.x_unwrap[3*i + j] * s.force[[i, j]];
                xcf += (self.est.x_unwrap[3*i + j] - self.est.xc[3*i + j]) * s.force[[i, j]];
            }
        }
        ring.barrier();
        self.est.atom_vir = ring.sum_ring(xf);
        self.est.centroid_vir = ring.sum_ring(xcf);
    }



    /// Primitive kinetic-energy estimator
    pub fn compute_t_prim(&mut self, s: &BeadSystem)
    {
        self.est.t_prim = 1.5 * (s.natoms as f64) * (self.np as f64) * self.kbt - self.est.total_spring_energy;
    }

    /// Bare virial and centroid-virial kinetic-energy estimators
    pub fn compute_t_vir(&mut self, s: &BeadSystem)
    {
        self.est.t_vir = -0.5 / (self.np as f64) * self.est.atom_vir;
        self.est.t_cv = 1.5 * (s.natoms as f64) * self.kbt - 0.5 / (self.np as f64) * self.est.centroid_vir;
    }

    /// Primitive pressure estimator
    pub fn compute_p_prim(&mut self, s: &BeadSystem)
    {
        let inv_volume: f64 = 1.0 / s.volume();
        self.est.p_prim = (s.natoms as f64) * (self.np as f64) * self.kbt * inv_volume
                        - 1.0 / 1.5 * inv_volume * self.est.total_spring_energy;
    }



    /// The bead pressure estimator, and the centroid-virial pressure computed
    /// by world 0 and broadcast so that every world shares one value
    pub fn compute_p_cv<R: RingComm>(&mut self, ring: &R, s: &BeadSystem)
    {
        let np: f64 = self.np as f64;
        let inv_volume: f64 = 1.0 / s.volume();
        self.est.p_md = 2.0 / 3.0 * inv_volume * (self.est.totke - self.est.total_spring_energy + 0.5 * self.est.vir / np);
        if self.iworld == 0
        {
            self.est.p_cv = 1.0 / 3.0 * inv_volume * (2.0 * self.est.ke_bead - self.est.centroid_vir + self.est.vir) / np;
        }
        ring.barrier();
        let mut p_cv_buf: [f64; 1] = [self.est.p_cv];
        ring.broadcast_ring(&mut p_cv_buf);
        self.est.p_cv = p_cv_buf[0];
    }



    /// Conserved total energy per bead
    pub fn compute_tote(&mut self)
    {
        self.est.tote = self.est.totke + self.est.pote + self.est.total_spring_energy;
    }

    /// Conserved enthalpy under a barostat; the BZP form carries the entropic
    /// log-volume correction, the MTTK form the reference-volume work term
    pub fn compute_totenthalpy(&mut self, s: &BeadSystem)
    {
        let volume: f64 = s.volume();
        let np: f64 = self.np as f64;
        match &self.barostat
        {
            Some(barostat) =>
            {
                match barostat.kind
                {
                    BarostatKind::Bzp =>
                    {
                        self.est.totenthalpy = self.est.tote + 0.5 * barostat.w * barostat.vw * barostat.vw / np
                                             + barostat.pext * volume - barostat.vcoeff * self.kbt * volume.ln();
                    },
                    BarostatKind::Mttk =>
                    {
                        self.est.totenthalpy = self.est.tote + 1.5 * barostat.w * barostat.vw * barostat.vw / np
                                             + barostat.pext * (volume - barostat.vol0);
                    },
                }
            },
            None => (),
        }
    }



    /// Interpolate every world's coordinates towards the centroid with the
    /// thermodynamic-integration lambda, from the ring view gathered by the
    /// latest centroid update
    pub fn compute_xscaled(&mut self, s: &BeadSystem)
    {
        let lambda: f64 = match &self.para.ti
        {
            Some(ti) => ti.lambda,
            None => return,
        };
        for j in 0..self.np
        {
            self.est.x_scaled[j].resize(3*s.nlocal, 0.0);
            for i in 0..3*s.nlocal
            {
                self.est.x_scaled[j][i] = lambda * self.exchange.buf_beads[j][i] + (1.0 - lambda) * self.est.xc[i];
            }
        }
    }



    /// The fixed-order diagnostics vector reported to the host after every
    /// step: [ke_bead, se_bead, pe_bead, tote, t_prim, t_vir, t_cv, p_prim,
    /// p_md, p_cv, vw, barostat kinetic energy, totenthalpy]
    pub fn diagnostics(&self) -> Array1<f64>
    {
        let (vw, ke_baro): (f64, f64) = match &self.barostat
        {
            Some(barostat) => (barostat.vw, 0.5 * barostat.w * barostat.vw * barostat.vw),
            None => (0.0, 0.0),
        };

        Array1::from(vec![
            self.est.ke_bead,
            self.est.se_bead,
            self.est.pe_bead,
            self.est.tote,
            self.est.t_prim,
            self.est.t_vir,
            self.est.t_cv,
            self.est.p_prim,
            self.est.p_md,
            self.est.p_cv,
            vw,
            ke_baro,
            self.est.totenthalpy,
        ])
    }
}
