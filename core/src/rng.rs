use rand::rngs::StdRng;
use rand::SeedableRng;

/// The single source of randomness for a session, owned by the coordinator. Seeding it
/// explicitly (rather than reaching for `rand::thread_rng()`, as the deck shuffle elsewhere in
/// this crate family tends to) is what makes a `SessionConfig { rng_seed: Some(_), .. }`
/// session fully reproducible end to end.
pub struct Random(StdRng);

impl Random {
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(StdRng::seed_from_u64(seed)),
            None => Self(StdRng::from_entropy()),
        }
    }

    pub fn inner_mut(&mut self) -> &mut StdRng {
        &mut self.0
    }
}
