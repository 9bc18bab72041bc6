//! About the local partition of one replica of the atomic system.
use std::collections::HashMap;
use ndarray::Array2;





/// The basic structure describing the local partition of one replica world.
///
/// Atoms are cross-referenced across worlds by their stable integer tag, not
/// by local index, because every world decomposes the same atoms differently
/// in space. The host engine refreshes coord, vel, force, pot, and press
/// around every timestep; the propagator returns updated coord, vel, and
/// box_len.
///
/// # Fields
/// ```
/// nlocal: the number of atoms in the local partition
/// natoms: the number of atoms of the whole replica
/// tag: the stable tags of the local atoms (nlocal Vec)
/// tag_map: the map from an atom tag to its local index
/// atom_type: the types of the local atoms (nlocal Vec)
/// mass: the physical mass of each atom type (ntypes Vec, Unit: A.U.)
/// coord: the coordinates of the local atoms (nlocal*3 Array, Unit: Bohr)
/// vel: the velocities of the local atoms (nlocal*3 Array, Unit: A.U.)
/// force: the forces on the local atoms (nlocal*3 Array, Unit: Hartree/Bohr)
/// image: the periodic image flags of the local atoms (nlocal*3 Array)
/// box_len: the edge lengths of the periodic box (Unit: Bohr)
/// pot: the potential energy of this world, computed externally (Unit: Hartree)
/// press: the six components xx yy zz xy xz yz of the pressure tensor of this
///        world, computed externally (Unit: Hartree/Bohr^3)
/// ```
#[derive(Clone, Debug)]
pub struct BeadSystem
{
    pub nlocal: usize,
    pub natoms: usize,
    pub tag: Vec<i64>,
    pub tag_map: HashMap<i64, usize>,
    pub atom_type: Vec<usize>,
    pub mass: Vec<f64>,
    pub coord: Array2<f64>,
    pub vel: Array2<f64>,
    pub force: Array2<f64>,
    pub image: Array2<i32>,
    pub box_len: [f64; 3],
    pub pot: f64,
    pub press: [f64; 6],
}





impl BeadSystem
{
    /// Construct the local partition from the host arrays, building the
    /// tag map used by the ring exchange to resolve requested atoms
    pub fn new(natoms: usize, tag: Vec<i64>, atom_type: Vec<usize>, mass: Vec<f64>, coord: Array2<f64>, vel: Array2<f64>, box_len: [f64; 3]) -> Self
    {
        let nlocal: usize = tag.len();
        let mut tag_map: HashMap<i64, usize> = HashMap::with_capacity(nlocal);
        for i in 0..nlocal
        {
            tag_map.insert(tag[i], i);
        }

        BeadSystem
        {
            nlocal,
            natoms,
            tag,
            tag_map,
            atom_type,
            mass,
            coord,
            vel,
            force: Array2::zeros((nlocal, 3)),
            image: Array2::zeros((nlocal, 3)),
            box_len,
            pot: 0.0,
            press: [0.0; 6],
        }
    }

    /// Rebuild the tag map after the host has migrated atoms between the
    /// spatial partitions of this world
    pub fn rebuild_tag_map(&mut self)
    {
        self.nlocal = self.tag.len();
        self.tag_map.clear();
        for i in 0..self.nlocal
        {
            self.tag_map.insert(self.tag[i], i);
        }
    }

    /// Volume of the periodic box
    pub fn volume(&self) -> f64
    {
        self.box_len[0] * self.box_len[1] * self.box_len[2]
    }

    /// Unwrap the coordinates by the periodic image flags, so that the ring
    /// polymer of an atom is never folded across the box boundary
    pub fn unmap(&mut self)
    {
        for i in 0..self.nlocal
        {
            for j in 0..3
            {
                self.coord[[i, j]] += (self.image[[i, j]] as f64) * self.box_len[j];
            }
        }
    }

    /// Wrap the coordinates back into the periodic box by the image flags
    pub fn unmap_inv(&mut self)
    {
        for i in 0..self.nlocal
        {
            for j in 0..3
            {
                self.coord[[i, j]] -= (self.image[[i, j]] as f64) * self.box_len[j];
            }
        }
    }
}










#[cfg(test)]
mod tests
{
    use super::*;
    use ndarray::array;

    #[test]
    fn tag_map_follows_the_tag_order()
    {
        let coord: Array2<f64> = array![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];
        let vel: Array2<f64> = Array2::zeros((2, 3));
        let s: BeadSystem = BeadSystem::new(2, vec![7, 3], vec![0, 0], vec![1.0], coord, vel, [10.0, 10.0, 10.0]);
        assert_eq!(s.tag_map[&7], 0);
        assert_eq!(s.tag_map[&3], 1);
    }

    #[test]
    fn unmap_is_inverted_by_unmap_inv()
    {
        let coord: Array2<f64> = array![[0.5, 9.5, 3.0]];
        let vel: Array2<f64> = Array2::zeros((1, 3));
        let mut s: BeadSystem = BeadSystem::new(1, vec![1], vec![0], vec![1.0], coord, vel, [10.0, 10.0, 10.0]);
        s.image[[0, 0]] = 1;
        s.image[[0, 1]] = -1;

        s.unmap();
        assert!((s.coord[[0, 0]] - 10.5).abs() < 1.0e-14);
        assert!((s.coord[[0, 1]] + 0.5).abs() < 1.0e-14);

        s.unmap_inv();
        assert!((s.coord[[0, 0]] - 0.5).abs() < 1.0e-14);
        assert!((s.coord[[0, 1]] - 9.5).abs() < 1.0e-14);
        assert!((s.coord[[0, 2]] - 3.0).abs() < 1.0e-14);
    }
}




