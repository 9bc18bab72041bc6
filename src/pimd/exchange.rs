//! About the all-to-all exchange of per-atom quantities across the replica ring.
use crate::common::error::*;
use crate::pimd::system::BeadSystem;
use crate::pimd::traits::RingComm;
use ndarray::Array2;





// Padding added whenever a buffer has to grow, to amortize the reallocation
const GROW_PAD: usize = 200;





/// The communication plan and the ring buffers of the replica exchange.
///
/// Every process must see every atom of its partition as held by every other
/// world, but no single process holds an atom's full ring history, so a
/// data-parallel transpose is required: for each of the other worlds, each
/// process sends the tags it needs to one peer process of that world, the
/// peer resolves the tags it owns against its local map and returns the
/// matching 3-vectors, and the originator scatters the replies by its own
/// tag map. Tags the peer does not own are silently skipped; the preceding
/// count handshake tells the originator how many replies to expect.
///
/// # Fields
/// ```
/// size_plan: the number of peer exchanges per gather, (nworlds-1)*procs_per_world
/// plan_send: the universe rank the requests are sent to, per plan entry
/// plan_recv: the universe rank the requests are received from, per plan entry
/// mode_index: the world whose data each plan entry delivers
/// buf_beads: one buffer per world, holding every local atom's 3-vector as
///            held by that world, indexed by the local atom order
/// ```
/// The buffers grow but never shrink, so repeated gathers do not reallocate.
pub struct RingExchange
{
    size_plan: usize,
    plan_send: Vec<usize>,
    plan_recv: Vec<usize>,
    mode_index: Vec<usize>,
    pub buf_beads: Vec<Vec<f64>>,
    max_nlocal: usize,
    max_nsend: usize,
    tag_search: Vec<i64>,
    tag_send: Vec<i64>,
    tag_recv: Vec<i64>,
    buf_send: Vec<f64>,
    buf_recv: Vec<f64>,
}





impl RingExchange
{
    /// Build the communication plan of the ring, visiting one process of
    /// every other world per offset so that the peers of a plan entry form
    /// matched send/receive pairs, and allocate the ring buffers
    ///
    /// # Parameters
    /// ```
    /// ring: the ring transport
    /// nlocal: the current local atom count, used to size the buffers
    /// ```
    pub fn new<R: RingComm>(ring: &R, nlocal: usize) -> Self
    {
        let np: usize = ring.num_worlds();
        let ncomms: usize = ring.procs_per_world();
        let iworld: usize = ring.world_index();
        let me: usize = ring.world_rank();

        let size_plan: usize = (np - 1) * ncomms;
        let mut plan_send: Vec<usize> = vec![0; size_plan];
        let mut plan_recv: Vec<usize> = vec![0; size_plan];
        let mut mode_index: Vec<usize> = vec![0; size_plan];
        for i in 0..(np - 1)
        {
            let i_send: usize = (iworld + i + 1) % np;
            let i_recv: usize = (iworld + np - i - 1) % np;
            for j in 0..ncomms
            {
                plan_send[i*ncomms + j] = i_send*ncomms + (me + j) % ncomms;
                plan_recv[i*ncomms + j] = i_recv*ncomms + (me + ncomms - j) % ncomms;
                mode_index[i*ncomms + j] = i_send;
            }
        }

        let max_nlocal: usize = nlocal + GROW_PAD;
        let max_nsend: usize = nlocal + GROW_PAD;

        RingExchange
        {
            size_plan,
            plan_send,
            plan_recv,
            mode_index,
            buf_beads: vec![vec![0.0; 3*max_nlocal]; np],
            max_nlocal,
            max_nsend,
            tag_search: vec![0; max_nsend],
            tag_send: vec![0; max_nsend],
            tag_recv: vec![0; max_nsend],
            buf_send: vec![0.0; 3*max_nsend],
            buf_recv: vec![0.0; 3*max_nsend],
        }
    }



    /// Gather one per-atom 3-vector array (positions, velocities, or forces)
    /// from every world into the ring buffers of every world
    ///
    /// # Parameters
    /// ```
    /// ring: the ring transport
    /// s: the local partition, providing the atom tags and the tag map
    /// values: the per-atom array of this world to be exchanged
    /// ```
    pub fn gather<R: RingComm>(&mut self, ring: &R, s: &BeadSystem, values: &Array2<f64>)
    {
        let nlocal: usize = s.nlocal;
        if nlocal > self.max_nlocal
        {
            self.max_nlocal = nlocal + GROW_PAD;
            for buf in self.buf_beads.iter_mut()
            {
                buf.resize(3*self.max_nlocal, 0.0);
            }
        }

        // This world's own column is a plain copy of the local values
        let local: &[f64] = values.as_slice().expect(&error_as_slice("values"));
        self.buf_beads[ring.world_index()][..3*nlocal].copy_from_slice(&local[..3*nlocal]);

        // Go over the communication plan
        for iplan in 0..self.size_plan
        {
            // Exchange the expected atom counts with the paired peers
            let nsearch: usize = ring.sendrecv_count(nlocal as i32, self.plan_send[iplan], self.plan_recv[iplan]) as usize;
            if nsearch > self.max_nsend
            {
                self.max_nsend = nsearch + GROW_PAD;
                self.tag_search.resize(self.max_nsend, 0);
                self.tag_send.resize(self.max_nsend, 0);
                self.buf_send.resize(3*self.max_nsend, 0.0);
            }

            // Exchange the tag lists to locate
            ring.sendrecv_tags(&s.tag[..nlocal], self.plan_send[iplan], &mut self.tag_search[..nsearch], self.plan_recv[iplan]);

            // Resolve the requested tags against the local tag map, silently
            // skipping the atoms this process does not own
            let mut nsend: usize = 0;
            for i in 0..nsearch
            {
                match s.tag_map.get(&self.tag_search[i])
                {
                    Some(&index) if index < nlocal =>
                    {
                        self.tag_send[nsend] = self.tag_search[i];
                        for d in 0..3
                        {
                            self.buf_send[3*nsend + d] = values[[index, d]];
                        }
                        nsend += 1;
                    },
                    _ => (),
                }
            }

            // Return the reply count, then the resolved tags and values
            let nrecv: usize = ring.sendrecv_count(nsend as i32, self.plan_recv[iplan], self.plan_send[iplan]) as usize;
            if nrecv > self.tag_recv.len()
            {
                self.tag_recv.resize(nrecv + GROW_PAD, 0);
                self.buf_recv.resize(3*(nrecv + GROW_PAD), 0.0);
            }
            ring.sendrecv_tags(&self.tag_send[..nsend], self.plan_recv[iplan], &mut self.tag_recv[..nrecv], self.plan_send[iplan]);
            ring.sendrecv_values(&self.buf_send[..3*nsend], self.plan_recv[iplan], &mut self.buf_recv[..3*nrecv], self.plan_send[iplan]);

            // Scatter the replies into the target world's column, indexed by
            // this process's own tag map
            let column: &mut Vec<f64> = &mut self.buf_beads[self.mode_index[iplan]];
            for i in 0..nrecv
            {
                let index: usize = *s.tag_map.get(&self.tag_recv[i]).expect(&error_tag_lookup(self.tag_recv[i]));
                for d in 0..3
                {
                    column[3*index + d] = self.buf_recv[3*i + d];
                }
            }
        }
    }
}










#[cfg(test)]
mod tests
{
    use super::*;
    use crate::pimd::channel::ChannelRing;
    use std::thread;
    use ndarray::Array2;

    fn shard(iworld: usize, tags: &[i64]) -> BeadSystem
    {
        // Every world holds the same atoms, in a locally permuted order, and
        // the 3-vectors encode (world, tag) so that any misrouted entry is
        // visible after the gather
        let nlocal: usize = tags.len();
        let mut coord: Array2<f64> = Array2::zeros((nlocal, 3));
        for i in 0..nlocal
        {
            coord[[i, 0]] = iworld as f64;
            coord[[i, 1]] = tags[i] as f64;
            coord[[i, 2]] = 100.0 * (iworld as f64) + (tags[i] as f64);
        }
        let vel: Array2<f64> = Array2::zeros((nlocal, 3));
        BeadSystem::new(nlocal, tags.to_vec(), vec![0; nlocal], vec![1.0], coord, vel, [10.0, 10.0, 10.0])
    }

    #[test]
    fn gather_fills_every_column_by_tag()
    {
        let np: usize = 4;
        let rings: Vec<ChannelRing> = ChannelRing::create(np);
        let handles: Vec<thread::JoinHandle<()>> = rings.into_iter().map(|ring| thread::spawn(move ||
        {
            let iworld: usize = ring.world_index();
            // Each world permutes the same six atoms differently
            let tags: Vec<i64> = (0..6).map(|i| 1 + ((i + 2*iworld) % 6) as i64).collect();
            let s: BeadSystem = shard(iworld, &tags);

            let mut exchange: RingExchange = RingExchange::new(&ring, s.nlocal);
            exchange.gather(&ring, &s, &s.coord);

            // Column j must contain exactly world j's values, in this world's
            // local atom order
            for j in 0..np
            {
                for i in 0..s.nlocal
                {
                    assert_eq!(exchange.buf_beads[j][3*i], j as f64);
                    assert_eq!(exchange.buf_beads[j][3*i + 1], tags[i] as f64);
                    assert_eq!(exchange.buf_beads[j][3*i + 2], 100.0 * (j as f64) + (tags[i] as f64));
                }
            }
        })).collect();

        for handle in handles
        {
            handle.join().expect("a ring world panicked");
        }
    }

    #[test]
    fn unresolved_tags_are_skipped_silently()
    {
        let np: usize = 2;
        let rings: Vec<ChannelRing> = ChannelRing::create(np);
        let handles: Vec<thread::JoinHandle<()>> = rings.into_iter().map(|ring| thread::spawn(move ||
        {
            let iworld: usize = ring.world_index();
            // World 1 does not hold atom 3, so world 0's request for it goes
            // unanswered while every other slot still fills
            let tags: Vec<i64> = if iworld == 0 { vec![1, 2, 3] } else { vec![2, 1] };
            let s: BeadSystem = shard(iworld, &tags);

            let mut exchange: RingExchange = RingExchange::new(&ring, s.nlocal);
            exchange.gather(&ring, &s, &s.coord);

            let other: usize = 1 - iworld;
            for i in 0..s.nlocal
            {
                if iworld == 0 && tags[i] == 3
                {
                    assert_eq!(exchange.buf_beads[other][3*i], 0.0);
                }
                else
                {
                    assert_eq!(exchange.buf_beads[other][3*i], other as f64);
                    assert_eq!(exchange.buf_beads[other][3*i + 1], tags[i] as f64);
                }
            }
        })).collect();

        for handle in handles
        {
            handle.join().expect("a ring world panicked");
        }
    }
}




