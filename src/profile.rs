//! Per-city climate profiles, derived once from the global seed.
//!
//! A single seeded stream is consumed in city list order: one draw picks the
//! archetype, three more draws give base temperature, variance and seasonal
//! amplitude. Changing that order changes which profile a city gets.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::city::CityList;

// Cumulative cutoffs: 20% hot, 15% cold, 30% temperate, 35% other.
const CUTOFF_HOT: f64 = 0.20;
const CUTOFF_COLD: f64 = 0.35;
const CUTOFF_TEMPERATE: f64 = 0.65;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Archetype {
    /// Deserts, tropics.
    Hot,
    /// Arctic, subarctic.
    Cold,
    Temperate,
    Other,
}

/// Closed intervals `(low, high)` an archetype maps its draws into.
struct Bounds {
    base_temp: (f64, f64),
    variance: (f64, f64),
    seasonal: (f64, f64),
}

impl Archetype {
    pub fn from_draw(draw: f64) -> Archetype {
        if draw < CUTOFF_HOT {
            Archetype::Hot
        } else if draw < CUTOFF_COLD {
            Archetype::Cold
        } else if draw < CUTOFF_TEMPERATE {
            Archetype::Temperate
        } else {
            Archetype::Other
        }
    }

    fn bounds(self) -> Bounds {
        match self {
            Archetype::Hot => Bounds {
                base_temp: (25.0, 40.0),
                variance: (5.0, 20.0),
                seasonal: (0.2, 0.5),
            },
            Archetype::Cold => Bounds {
                base_temp: (-25.0, -10.0),
                variance: (10.0, 30.0),
                seasonal: (0.5, 0.9),
            },
            Archetype::Temperate => Bounds {
                base_temp: (5.0, 20.0),
                variance: (10.0, 20.0),
                seasonal: (0.6, 0.9),
            },
            Archetype::Other => Bounds {
                base_temp: (-35.0, 35.0),
                variance: (5.0, 30.0),
                seasonal: (0.2, 1.0),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CityProfile {
    pub base_temp: f64,
    pub variance: f64,
    pub seasonal: f64,
}

impl CityProfile {
    fn draw<R: Rng>(archetype: Archetype, rng: &mut R) -> CityProfile {
        let bounds = archetype.bounds();

        // Field initializers evaluate in order: temp, variance, seasonal.
        CityProfile {
            base_temp: scale(rng.gen::<f64>(), bounds.base_temp),
            variance: scale(rng.gen::<f64>(), bounds.variance),
            seasonal: scale(rng.gen::<f64>(), bounds.seasonal),
        }
    }
}

#[inline]
fn scale(draw: f64, (low, high): (f64, f64)) -> f64 {
    low + draw * (high - low)
}

/// Immutable table of profiles, indexed like the city list.
#[derive(Debug, Clone)]
pub struct ProfileTable {
    profiles: Vec<CityProfile>,
    archetypes: Vec<Archetype>,
}

impl ProfileTable {
    pub fn build(seed: u64, cities: &CityList) -> ProfileTable {
        let mut rng = StdRng::seed_from_u64(seed);

        let (profiles, archetypes) = (0..cities.len())
            .map(|_| {
                let archetype = Archetype::from_draw(rng.gen::<f64>());
                (CityProfile::draw(archetype, &mut rng), archetype)
            })
            .unzip();

        log::debug!("Built {} city profiles with seed {}", cities.len(), seed);

        ProfileTable {
            profiles,
            archetypes,
        }
    }

    #[inline]
    pub fn get(&self, index: usize) -> &CityProfile {
        &self.profiles[index]
    }

    #[inline]
    pub fn archetype(&self, index: usize) -> Archetype {
        self.archetypes[index]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
