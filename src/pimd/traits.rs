//! About the traits
use crate::pimd::system::BeadSystem;





/// The abstract transport connecting the ring of replica worlds.
///
/// One world is one full replica of the atomic system, decomposed over
/// procs_per_world processes; the worlds occupy consecutive, equally-sized
/// blocks of the universe ranks. Every operation is blocking, and the
/// point-to-point exchanges address peers by their universe rank.
pub trait RingComm
{
    fn num_worlds(&self) -> usize;
    fn world_index(&self) -> usize;
    fn procs_per_world(&self) -> usize;
    fn world_rank(&self) -> usize;
    fn universe_rank(&self) -> usize;

    /// Send a count to universe rank 'to' and receive one from universe rank 'from'
    fn sendrecv_count(&self, nsend: i32, to: usize, from: usize) -> i32;

    /// Send a tag list to universe rank 'to' and receive one from universe rank 'from'
    fn sendrecv_tags(&self, send: &[i64], to: usize, recv: &mut [i64], from: usize);

    /// Send a value buffer to universe rank 'to' and receive one from universe rank 'from'
    fn sendrecv_values(&self, send: &[f64], to: usize, recv: &mut [f64], from: usize);

    /// Broadcast from universe rank 0 to every process of every world
    fn broadcast_ring(&self, values: &mut [f64]);

    /// Broadcast from the world-local rank 0 to every process of this world
    fn broadcast_world(&self, values: &mut [f64]);

    /// Sum a scalar over every process of every world
    fn sum_ring(&self, value: f64) -> f64;

    /// Sum a scalar over the processes of this world
    fn sum_world(&self, value: f64) -> f64;

    /// Block until every process of every world reaches the same call
    fn barrier(&self);
}





/// Which half of the operator-splitting timestep is being integrated.
#[derive(Clone, Debug, PartialEq)]
pub enum StepHalf
{
    Initial,
    Final,
}





/// The lifecycle of the propagator, driven by an external timestep loop:
/// setup once after the first force evaluation, then per timestep
/// integrate_half(Initial), the host force evaluation, after_force,
/// integrate_half(Final), and end_of_step.
pub trait PathIntegralStepper
{
    fn setup<R: RingComm>(&mut self, ring: &R, s: &mut BeadSystem);
    fn integrate_half<R: RingComm>(&mut self, ring: &R, s: &mut BeadSystem, half: StepHalf);
    fn after_force<R: RingComm>(&mut self, ring: &R, s: &mut BeadSystem);
    fn end_of_step<R: RingComm>(&mut self, ring: &R, s: &mut BeadSystem);
}




