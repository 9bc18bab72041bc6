//! About the matrix operations.

use crate::common::constants::PI;
use ndarray::{Array1, Array2};





/// Eigenvalues of the cyclic ring-coupling matrix of a ring polymer with np beads
///
/// # Parameters
/// ```
/// np: the number of beads along the imaginary-time ring
/// lam: the eigenvalues 4*sin^2(i*pi/np), with lam[0] = 0 for the centroid mode
/// ```
pub fn ring_eigenvalues(np: usize) -> Array1<f64>
{
    let mut lam: Array1<f64> = Array1::zeros(np);
    for i in 0..np
    {
        let sin_i: f64 = ((i as f64) * PI / (np as f64)).sin();
        lam[i] = 4.0 * sin_i * sin_i;
    }

    lam
}





/// Orthogonal eigenbasis of the cyclic ring-coupling matrix (the discrete Fourier eigenbasis)
///
/// # Parameters
/// ```
/// np: the number of beads along the imaginary-time ring
/// u: the np*np transform matrix, whose row i maps bead coordinates to normal mode i
/// ```
///
/// Row 0 is the uniform centroid vector, rows 1..=np/2 are the cosine vectors,
/// rows np/2+1..np are the sine vectors, and for even np row np/2 degenerates
/// to the alternating vector (-1)^j / sqrt(np).
pub fn ring_eigenbasis(np: usize) -> Array2<f64>
{
    let mut u: Array2<f64> = Array2::zeros((np, np));
    let np_f: f64 = np as f64;

    // The paired cosine and sine eigenvectors of the degenerated modes
    for j in 0..np
    {
        for i in 1..(np/2 + 1)
        {
            u[[i, j]] = (2.0_f64).sqrt() * (2.0 * PI * (i as f64) * (j as f64) / np_f).cos() / np_f.sqrt();
        }
        for i in (np/2 + 1)..np
        {
            u[[i, j]] = (2.0_f64).sqrt() * (2.0 * PI * (i as f64) * (j as f64) / np_f).sin() / np_f.sqrt();
        }
    }

    // The non-degenerated modes: the uniform centroid vector, and the alternating vector for even np
    for j in 0..np
    {
        u[[0, j]] = 1.0 / np_f.sqrt();
        if np % 2 == 0
        {
            u[[np/2, j]] = (-1.0_f64).powi(j as i32) / np_f.sqrt();
        }
    }

    u
}










#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn eigenvalues_start_at_zero()
    {
        for np in 1..9
        {
            let lam: Array1<f64> = ring_eigenvalues(np);
            assert_eq!(lam.len(), np);
            assert!(lam[0].abs() < 1.0e-14);
            for i in 0..np
            {
                assert!(lam[i] >= 0.0);
            }
        }
    }

    #[test]
    fn eigenbasis_is_orthogonal()
    {
        for np in 1..9
        {
            let u: Array2<f64> = ring_eigenbasis(np);
            let uut: Array2<f64> = u.dot(&u.t());
            for i in 0..np
            {
                for j in 0..np
                {
                    let expected: f64 = if i == j { 1.0 } else { 0.0 };
                    assert!((uut[[i, j]] - expected).abs() < 1.0e-10, "np = {}, U*Ut[{}][{}] = {}", np, i, j, uut[[i, j]]);
                }
            }
        }
    }

    #[test]
    fn even_ring_has_alternating_mode()
    {
        let np: usize = 6;
        let u: Array2<f64> = ring_eigenbasis(np);
        for j in 0..np
        {
            let expected: f64 = (-1.0_f64).powi(j as i32) / (np as f64).sqrt();
            assert!((u[[np/2, j]] - expected).abs() < 1.0e-14);
        }
    }
}




