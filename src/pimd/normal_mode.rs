//! About the normal-mode eigenbasis and the fictitious masses of the ring polymer.
use crate::io::input::FmMode;
use crate::matrix::{ring_eigenbasis, ring_eigenvalues};
use ndarray::{Array1, Array2, ArrayView1};





/// The normal-mode transform of the ring polymer, built once from the ring
/// length and immutable afterwards. After the transform, every world holds
/// exactly one normal mode: the mode whose index equals the world index, so
/// each world owns one row of the transform matrices.
///
/// # Fields
/// ```
/// np: the number of beads along the imaginary-time ring
/// iworld: the index of this world (i.e. the normal mode it owns)
/// lam: the eigenvalues of the cyclic ring-coupling matrix (np Array)
/// m_x2xp: the orthogonal transform from bead coordinates to normal modes (np*np Array)
/// m_xp2x: the inverse transform, the exact transpose of m_x2xp (np*np Array)
/// mass: the fictitious mass of each atom type for this world's mode (ntypes Vec)
/// omega_k: the natural frequency of each normal mode (np Array, Unit: A.U.)
/// lan_c: cos(omega_k * dt/2), the free ring rotation cosine of each mode
/// lan_s: sin(omega_k * dt/2), the free ring rotation sine of each mode
/// ```
pub struct NormalModeTransform
{
    pub np: usize,
    pub iworld: usize,
    pub lam: Array1<f64>,
    pub m_x2xp: Array2<f64>,
    pub m_xp2x: Array2<f64>,
    pub mass: Vec<f64>,
    pub omega_k: Array1<f64>,
    pub lan_c: Array1<f64>,
    pub lan_s: Array1<f64>,
}





impl NormalModeTransform
{
    /// Build the eigenbasis, the fictitious-mass table, and the free ring
    /// rotation coefficients for one world of a ring with np beads
    ///
    /// # Parameters
    /// ```
    /// np: the number of beads along the imaginary-time ring
    /// iworld: the index of this world
    /// fmmode: the fictitious-mass mode of the non-centroid modes
    /// fmass: the user scale factor of the fictitious masses
    /// phys_mass: the physical mass of each atom type (Unit: A.U.)
    /// omega_np: the ring frequency np/(hbar*beta) (Unit: A.U.)
    /// dt: the integration timestep (Unit: A.U.)
    /// ```
    pub fn new(np: usize, iworld: usize, fmmode: &FmMode, fmass: f64, phys_mass: &[f64], omega_np: f64, dt: f64) -> Self
    {
        let lam: Array1<f64> = ring_eigenvalues(np);
        let m_x2xp: Array2<f64> = ring_eigenbasis(np);
        let m_xp2x: Array2<f64> = m_x2xp.t().to_owned();

        // The centroid mode keeps the physical masses; the other modes are
        // scaled by the eigenvalue in the 'normal' fictitious-mass mode, and
        // by the user factor in both modes
        let mut mass: Vec<f64> = phys_mass.to_vec();
        if iworld != 0
        {
            for i in 0..mass.len()
            {
                match fmmode
                {
                    FmMode::Physical => (),
                    FmMode::Normal => mass[i] *= lam[iworld],
                }
                mass[i] *= fmass;
            }
        }

        // The natural frequency of each mode, and the cosine/sine pair that
        // rotates position and velocity during the free ring propagation
        let mut omega_k: Array1<f64> = Array1::zeros(np);
        let mut lan_c: Array1<f64> = Array1::zeros(np);
        let mut lan_s: Array1<f64> = Array1::zeros(np);
        let omega_np_dt_half: f64 = omega_np * dt * 0.5;
        for i in 0..np
        {
            match fmmode
            {
                FmMode::Physical =>
                {
                    omega_k[i] = omega_np * lam[i].sqrt();
                    lan_c[i] = (lam[i].sqrt() * omega_np_dt_half).cos();
                    lan_s[i] = (lam[i].sqrt() * omega_np_dt_half).sin();
                },
                FmMode::Normal =>
                {
                    omega_k[i] = omega_np;
                    lan_c[i] = omega_np_dt_half.cos();
                    lan_s[i] = omega_np_dt_half.sin();
                },
            }
        }

        NormalModeTransform
        {
            np,
            iworld,
            lam,
            m_x2xp,
            m_xp2x,
            mass,
            omega_k,
            lan_c,
            lan_s,
        }
    }



    /// Project the full ring view onto the normal mode owned by this world
    pub fn to_modes(&self, buf_beads: &[Vec<f64>], dest: &mut Array2<f64>)
    {
        Self::project(self.m_x2xp.row(self.iworld), buf_beads, dest);
    }

    /// Recombine the full normal-mode view into this world's bead coordinates
    pub fn to_cartesian(&self, buf_beads: &[Vec<f64>], dest: &mut Array2<f64>)
    {
        Self::project(self.m_xp2x.row(self.iworld), buf_beads, dest);
    }

    fn project(vector: ArrayView1<f64>, buf_beads: &[Vec<f64>], dest: &mut Array2<f64>)
    {
        let nlocal: usize = dest.shape()[0];
        let np: usize = vector.len();
        for i in 0..nlocal
        {
            for d in 0..3
            {
                dest[[i, d]] = 0.0;
                for j in 0..np
                {
                    dest[[i, d]] += buf_beads[j][3*i + d] * vector[j];
                }
            }
        }
    }
}










#[cfg(test)]
mod tests
{
    use super::*;
    use ndarray::Array2;
    use ndarray_rand::RandomExt;
    use ndarray_rand::rand_distr::Uniform;

    #[test]
    fn mode_round_trip_reproduces_the_beads()
    {
        let np: usize = 4;
        let nlocal: usize = 3;
        let transforms: Vec<NormalModeTransform> = (0..np).map(|iworld|
        {
            NormalModeTransform::new(np, iworld, &FmMode::Physical, 1.0, &[1836.0], 2.0, 10.0)
        }).collect();

        // Every world holds one bead of the same three atoms
        let cart: Vec<Array2<f64>> = (0..np).map(|_| Array2::random((nlocal, 3), Uniform::new(-1.0, 1.0))).collect();
        let buf_cart: Vec<Vec<f64>> = cart.iter().map(|x| x.iter().cloned().collect()).collect();

        // Forward transform in every world, gathering the mode view
        let mut buf_modes: Vec<Vec<f64>> = vec![vec![0.0; 3*nlocal]; np];
        for iworld in 0..np
        {
            let mut modes: Array2<f64> = Array2::zeros((nlocal, 3));
            transforms[iworld].to_modes(&buf_cart, &mut modes);
            buf_modes[iworld] = modes.iter().cloned().collect();
        }

        // Backward transform must reproduce the original beads
        for iworld in 0..np
        {
            let mut back: Array2<f64> = Array2::zeros((nlocal, 3));
            transforms[iworld].to_cartesian(&buf_modes, &mut back);
            for i in 0..nlocal
            {
                for d in 0..3
                {
                    assert!((back[[i, d]] - cart[iworld][[i, d]]).abs() < 1.0e-10);
                }
            }
        }
    }

    #[test]
    fn single_bead_keeps_the_physical_masses()
    {
        let phys_mass: [f64; 2] = [1836.0, 29376.0];
        for fmmode in [FmMode::Physical, FmMode::Normal]
        {
            let nm: NormalModeTransform = NormalModeTransform::new(1, 0, &fmmode, 0.5, &phys_mass, 2.0, 10.0);
            assert_eq!(nm.mass, phys_mass.to_vec());
        }
    }

    #[test]
    fn normal_mode_masses_scale_with_the_eigenvalue()
    {
        let np: usize = 4;
        let iworld: usize = 2;
        let fmass: f64 = 0.5;
        let nm: NormalModeTransform = NormalModeTransform::new(np, iworld, &FmMode::Normal, fmass, &[1836.0], 2.0, 10.0);
        assert!((nm.mass[0] - 1836.0 * nm.lam[iworld] * fmass).abs() < 1.0e-10);

        // The centroid world keeps the physical mass in both modes
        let nm0: NormalModeTransform = NormalModeTransform::new(np, 0, &FmMode::Normal, fmass, &[1836.0], 2.0, 10.0);
        assert_eq!(nm0.mass[0], 1836.0);
    }
}




