// nrgs-core/src/units.rs

use uom::si::f64::{Energy as UomEnergy, Power as UomPower, Time as UomTime};

// Public canonical unit types (SI, f64)
pub type Energy = UomEnergy;
pub type Power = UomPower;
pub type Time = UomTime;

#[inline]
pub fn mw(v: f64) -> Power {
    use uom::si::power::megawatt;
    Power::new::<megawatt>(v)
}

#[inline]
pub fn hours(v: f64) -> Time {
    use uom::si::time::hour;
    Time::new::<hour>(v)
}

/// Energy delivered by a constant power over an interval, in MWh.
#[inline]
pub fn energy_mwh(power: Power, duration: Time) -> f64 {
    use uom::si::energy::megawatt_hour;
    let energy: Energy = power * duration;
    energy.get::<megawatt_hour>()
}

/// Energy of an hourly MW series (one sample per hour), in MWh.
pub fn hourly_energy_mwh(series_mw: &[f64]) -> f64 {
    let one_hour = hours(1.0);
    series_mw.iter().map(|&p| energy_mwh(mw(p), one_hour)).sum()
}

pub mod constants {
    /// Grams per kWh equals kilograms per MWh; divide by this to get tonnes per MWh.
    pub const G_PER_KWH_TO_T_PER_MWH: f64 = 1_000.0;
}
