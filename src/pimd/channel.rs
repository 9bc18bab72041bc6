//! About the in-process transport of the replica ring.
use std::sync::{Arc, Barrier, Mutex};
use std::sync::mpsc::{channel, Receiver, Sender};
use crate::common::error::*;
use crate::pimd::traits::RingComm;





/// One message passed between two worlds of the in-process ring.
pub enum RingPacket
{
    Count(i32),
    Tags(Vec<i64>),
    Values(Vec<f64>),
}





/// The ring transport for all the worlds running inside one process, each
/// world on its own thread. The point-to-point exchanges go through one
/// unbounded channel per ordered world pair, and the collectives go through
/// a shared slot vector guarded by a barrier, so the blocking semantics
/// match the MPI transport.
///
/// # Fields
/// ```
/// iworld: the index of this world along the ring
/// nworlds: the number of replica worlds along the ring
/// senders: the sending half of the channel towards each world
/// receivers: the receiving half of the channel from each world
/// reduce_slots: one accumulator slot per world for the sum collectives
/// bcast_slots: the shared buffer for the broadcast collectives
/// barrier: the all-worlds synchronization point
/// ```
pub struct ChannelRing
{
    pub iworld: usize,
    pub nworlds: usize,
    senders: Vec<Sender<RingPacket>>,
    receivers: Vec<Receiver<RingPacket>>,
    reduce_slots: Arc<Mutex<Vec<f64>>>,
    bcast_slots: Arc<Mutex<Vec<f64>>>,
    barrier: Arc<Barrier>,
}





impl ChannelRing
{
    /// Create the connected transports of every world of an in-process ring,
    /// one entry per world, to be moved into the per-world threads
    ///
    /// # Examples
    /// ```
    /// let rings: Vec<ChannelRing> = ChannelRing::create(4);
    /// ```
    pub fn create(nworlds: usize) -> Vec<ChannelRing>
    {
        let mut senders: Vec<Vec<Sender<RingPacket>>> = (0..nworlds).map(|_| Vec::with_capacity(nworlds)).collect();
        let mut receivers: Vec<Vec<Receiver<RingPacket>>> = (0..nworlds).map(|_| Vec::with_capacity(nworlds)).collect();
        for src in 0..nworlds
        {
            for dst in 0..nworlds
            {
                let (tx, rx): (Sender<RingPacket>, Receiver<RingPacket>) = channel();
                senders[src].push(tx);
                receivers[dst].push(rx);
            }
        }
        // The receivers of world dst were pushed in src order, so receivers[dst][src]
        // is the channel from world src to world dst

        let reduce_slots: Arc<Mutex<Vec<f64>>> = Arc::new(Mutex::new(vec![0.0; nworlds]));
        let bcast_slots: Arc<Mutex<Vec<f64>>> = Arc::new(Mutex::new(Vec::new()));
        let barrier: Arc<Barrier> = Arc::new(Barrier::new(nworlds));

        let mut rings: Vec<ChannelRing> = Vec::with_capacity(nworlds);
        for iworld in (0..nworlds).rev()
        {
            rings.push(ChannelRing
            {
                iworld,
                nworlds,
                senders: senders.pop().expect(&error_none_value("senders")),
                receivers: receivers.pop().expect(&error_none_value("receivers")),
                reduce_slots: Arc::clone(&reduce_slots),
                bcast_slots: Arc::clone(&bcast_slots),
                barrier: Arc::clone(&barrier),
            });
        }
        rings.reverse();

        rings
    }
}





impl RingComm for ChannelRing
{
    fn num_worlds(&self) -> usize
    {
        self.nworlds
    }

    fn world_index(&self) -> usize
    {
        self.iworld
    }

    fn procs_per_world(&self) -> usize
    {
        1
    }

    fn world_rank(&self) -> usize
    {
        0
    }

    fn universe_rank(&self) -> usize
    {
        self.iworld
    }

    fn sendrecv_count(&self, nsend: i32, to: usize, from: usize) -> i32
    {
        self.senders[to].send(RingPacket::Count(nsend)).expect(&error_channel("sending", self.iworld));
        match self.receivers[from].recv().expect(&error_channel("receiving", self.iworld))
        {
            RingPacket::Count(n) => n,
            _ => panic!("{}", error_channel("receiving", self.iworld)),
        }
    }

    fn sendrecv_tags(&self, send: &[i64], to: usize, recv: &mut [i64], from: usize)
    {
        self.senders[to].send(RingPacket::Tags(send.to_vec())).expect(&error_channel("sending", self.iworld));
        match self.receivers[from].recv().expect(&error_channel("receiving", self.iworld))
        {
            RingPacket::Tags(tags) => recv.copy_from_slice(&tags[..recv.len()]),
            _ => panic!("{}", error_channel("receiving", self.iworld)),
        }
    }

    fn sendrecv_values(&self, send: &[f64], to: usize, recv: &mut [f64], from: usize)
    {
        self.senders[to].send(RingPacket::Values(send.to_vec())).expect(&error_channel("sending", self.iworld));
        match self.receivers[from].recv().expect(&error_channel("receiving", self.iworld))
        {
            RingPacket::Values(values) => recv.copy_from_slice(&values[..recv.len()]),
            _ => panic!("{}", error_channel("receiving", self.iworld)),
        }
    }

    fn broadcast_ring(&self, values: &mut [f64])
    {
        if self.iworld == 0
        {
            let mut slots = self.bcast_slots.lock().expect(&error_none_value("bcast_slots"));
            slots.clear();
            slots.extend_from_slice(values);
        }
        self.barrier.wait();
        if self.iworld != 0
        {
            let slots = self.bcast_slots.lock().expect(&error_none_value("bcast_slots"));
            values.copy_from_slice(&slots[..values.len()]);
        }
        self.barrier.wait();
    }

    fn broadcast_world(&self, _values: &mut [f64])
    {
        // One process per world, nothing to do
    }

    fn sum_ring(&self, value: f64) -> f64
    {
        {
            let mut slots = self.reduce_slots.lock().expect(&error_none_value("reduce_slots"));
            slots[self.iworld] = value;
        }
        self.barrier.wait();
        let total: f64 = self.reduce_slots.lock().expect(&error_none_value("reduce_slots")).iter().sum();
        self.barrier.wait();

        total
    }

    fn sum_world(&self, value: f64) -> f64
    {
        value
    }

    fn barrier(&self)
    {
        self.barrier.wait();
    }
}










#[cfg(test)]
mod tests
{
    use super::*;
    use std::thread;

    #[test]
    fn point_to_point_and_collectives_connect_the_worlds()
    {
        let rings: Vec<ChannelRing> = ChannelRing::create(3);
        let handles: Vec<thread::JoinHandle<()>> = rings.into_iter().map(|ring| thread::spawn(move ||
        {
            let me: usize = ring.world_index();
            let next: usize = (me + 1) % 3;
            let last: usize = (me + 2) % 3;

            // Pass a count around the ring
            let n: i32 = ring.sendrecv_count(me as i32, next, last);
            assert_eq!(n, last as i32);

            // Pass tags and values around the ring
            let mut tags: [i64; 2] = [0; 2];
            ring.sendrecv_tags(&[me as i64, 10 + me as i64], next, &mut tags, last);
            assert_eq!(tags, [last as i64, 10 + last as i64]);

            let mut values: [f64; 1] = [0.0];
            ring.sendrecv_values(&[me as f64], next, &mut values, last);
            assert_eq!(values[0], last as f64);

            // Reduce and broadcast over the whole ring
            assert_eq!(ring.sum_ring(1.0), 3.0);
            let mut root_value: [f64; 1] = [if me == 0 { 2.5 } else { 0.0 }];
            ring.broadcast_ring(&mut root_value);
            assert_eq!(root_value[0], 2.5);
        })).collect();

        for handle in handles
        {
            handle.join().expect("a ring world panicked");
        }
    }
}




