//! About the MPI transport of the replica ring.
use crate::common::constants::ROOT_RANK;
use crate::common::error::*;
use crate::pimd::traits::RingComm;
use mpi::collective::SystemOperation;
use mpi::point_to_point as p2p;
use mpi::topology::Rank;
use mpi::traits::*;





/// The ring transport over two MPI communicators: the universe spanning every
/// process of every world, and the world-local communicator obtained from it
/// with split_by_color. The worlds occupy consecutive, equally-sized blocks
/// of the universe ranks.
///
/// # Fields
/// ```
/// uworld: the communicator spanning all the processes of all the worlds
/// world: the communicator spanning the processes of this world only
/// nworlds: the number of replica worlds along the ring
/// ```
pub struct MpiRing<'a, U: Communicator, W: Communicator>
{
    pub uworld: &'a U,
    pub world: &'a W,
    pub nworlds: usize,
}





impl<'a, U: Communicator, W: Communicator> MpiRing<'a, U, W>
{
    pub fn new(uworld: &'a U, world: &'a W, nworlds: usize) -> Self
    {
        let nprocs: usize = uworld.size() as usize;
        if (nworlds == 0) || (nprocs % nworlds != 0) || (world.size() as usize != nprocs / nworlds)
        {
            panic!("{}", error_ring_layout(nprocs, nworlds));
        }

        MpiRing
        {
            uworld,
            world,
            nworlds,
        }
    }
}





impl<'a, U: Communicator, W: Communicator> RingComm for MpiRing<'a, U, W>
{
    fn num_worlds(&self) -> usize
    {
        self.nworlds
    }

    fn world_index(&self) -> usize
    {
        (self.uworld.rank() as usize) / (self.world.size() as usize)
    }

    fn procs_per_world(&self) -> usize
    {
        self.world.size() as usize
    }

    fn world_rank(&self) -> usize
    {
        self.world.rank() as usize
    }

    fn universe_rank(&self) -> usize
    {
        self.uworld.rank() as usize
    }

    fn sendrecv_count(&self, nsend: i32, to: usize, from: usize) -> i32
    {
        let send: [i32; 1] = [nsend];
        let mut recv: [i32; 1] = [0];
        p2p::send_receive_into(&send[..], &self.uworld.process_at_rank(to as Rank),
                               &mut recv[..], &self.uworld.process_at_rank(from as Rank));
        recv[0]
    }

    fn sendrecv_tags(&self, send: &[i64], to: usize, recv: &mut [i64], from: usize)
    {
        p2p::send_receive_into(send, &self.uworld.process_at_rank(to as Rank),
                               recv, &self.uworld.process_at_rank(from as Rank));
    }

    fn sendrecv_values(&self, send: &[f64], to: usize, recv: &mut [f64], from: usize)
    {
        p2p::send_receive_into(send, &self.uworld.process_at_rank(to as Rank),
                               recv, &self.uworld.process_at_rank(from as Rank));
    }

    fn broadcast_ring(&self, values: &mut [f64])
    {
        self.uworld.process_at_rank(ROOT_RANK).broadcast_into(values);
    }

    fn broadcast_world(&self, values: &mut [f64])
    {
        self.world.process_at_rank(ROOT_RANK).broadcast_into(values);
    }

    fn sum_ring(&self, value: f64) -> f64
    {
        let mut total: f64 = 0.0;
        self.uworld.all_reduce_into(&value, &mut total, SystemOperation::sum());
        total
    }

    fn sum_world(&self, value: f64) -> f64
    {
        let mut total: f64 = 0.0;
        self.world.all_reduce_into(&value, &mut total, SystemOperation::sum());
        total
    }

    fn barrier(&self)
    {
        self.uworld.barrier();
    }
}




