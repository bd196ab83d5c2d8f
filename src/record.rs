//! Synthesize single `city;temperature` records.

use std::f64::consts::TAU;
use std::fmt::{self, Display};

use bytes::BytesMut;
use rand::Rng;

use crate::city::{CityList, DELIMITER};
use crate::profile::{CityProfile, ProfileTable};

pub const MIN_TEMP: f64 = -99.9;
pub const MAX_TEMP: f64 = 99.9;

const DAYS_PER_YEAR: u64 = 365;

/// Longest encoded temperature, `-99.9`.
const MAX_TEMP_LEN: usize = 5;

/// A temperature held as whole tenths of a degree.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Temperature(i16);

impl Temperature {
    /// Clamp into `[-99.9, 99.9]` and round to tenths, half away from zero.
    pub fn from_raw(raw: f64) -> Temperature {
        let clamped = raw.max(MIN_TEMP).min(MAX_TEMP);
        Temperature((clamped * 10.0).round() as i16)
    }

    #[inline]
    pub fn tenths(self) -> i16 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 10.0
    }

    /// Encode with exactly one fractional digit, negative zero never shows up
    /// since the value is integral at this point.
    fn encode(self, out: &mut [u8; MAX_TEMP_LEN]) -> &[u8] {
        let abs = self.0.unsigned_abs();
        let whole = abs / 10;
        let mut len = 0;

        if self.0 < 0 {
            out[len] = b'-';
            len += 1;
        }
        if whole >= 10 {
            out[len] = b'0' + (whole / 10) as u8;
            len += 1;
        }
        out[len] = b'0' + (whole % 10) as u8;
        out[len + 1] = b'.';
        out[len + 2] = b'0' + (abs % 10) as u8;

        &out[..len + 3]
    }

    #[inline]
    pub fn write_into(self, buf: &mut BytesMut) {
        let mut out = [0u8; MAX_TEMP_LEN];
        buf.extend_from_slice(self.encode(&mut out));
    }
}

impl Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let mut out = [0u8; MAX_TEMP_LEN];
        let text = std::str::from_utf8(self.encode(&mut out)).map_err(|_| fmt::Error)?;
        f.write_str(text)
    }
}

/// Time of year effect for a line, the line index doubles as day counter.
#[inline]
fn seasonal_phase(line_index: u64) -> f64 {
    (line_index % DAYS_PER_YEAR) as f64 * TAU / DAYS_PER_YEAR as f64
}

/// Combine a city profile with the day of year and a noise draw in `[-1, 1)`.
pub fn temperature_for(profile: &CityProfile, line_index: u64, noise: f64) -> Temperature {
    let time_effect = seasonal_phase(line_index).sin() * profile.seasonal;

    let raw = profile.base_temp
        + time_effect * profile.variance
        + noise * profile.variance * (1.0 - profile.seasonal);

    Temperature::from_raw(raw)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record<'a> {
    pub city_index: usize,
    pub city: &'a str,
    pub temperature: Temperature,
}

impl Display for Record<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{};{}", self.city, self.temperature)
    }
}

/// Read-only city names and profiles, shared by every worker.
#[derive(Debug)]
pub struct Synthesizer {
    cities: CityList,
    profiles: ProfileTable,
}

impl Synthesizer {
    pub fn new(seed: u64, cities: CityList) -> Synthesizer {
        let profiles = ProfileTable::build(seed, &cities);
        Synthesizer { cities, profiles }
    }

    /// Draw a city, then a noise value, from the worker's private stream.
    #[inline]
    pub fn next_record<R: Rng>(&self, line_index: u64, rng: &mut R) -> Record<'_> {
        let city_index = rng.gen_range(0, self.cities.len());
        let noise = rng.gen_range(-1.0, 1.0);

        Record {
            city_index,
            city: self.cities.name(city_index),
            temperature: temperature_for(self.profiles.get(city_index), line_index, noise),
        }
    }

    /// Append one record without the line terminator.
    #[inline]
    pub fn write_record<R: Rng>(&self, line_index: u64, rng: &mut R, buf: &mut BytesMut) {
        let record = self.next_record(line_index, rng);

        buf.extend_from_slice(record.city.as_bytes());
        buf.extend_from_slice(&[DELIMITER]);
        record.temperature.write_into(buf);
    }
}
