/// The logistic function, the only activation used by the network.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sigmoid;

impl Sigmoid {
    pub fn f(&self, z: f32) -> f32 {
        1. / (1. + (-z).exp())
    }

    /// The derivative expressed on an already activated value `a = f(z)`.
    pub fn df(&self, a: f32) -> f32 {
        a * (1. - a)
    }
}
