// fp-core/src/units.rs

use uom::si::f64::{
    Energy as UomEnergy, Power as UomPower, Time as UomTime, Volume as UomVolume,
    VolumeRate as UomVolumeRate,
};

// Public canonical unit types (SI, f64)
pub type Energy = UomEnergy;
pub type Power = UomPower;
pub type Time = UomTime;
pub type Volume = UomVolume;
pub type VolumeRate = UomVolumeRate;

#[inline]
pub fn joules(v: f64) -> Energy {
    use uom::si::energy::joule;
    Energy::new::<joule>(v)
}

#[inline]
pub fn kwh(v: f64) -> Energy {
    use uom::si::energy::kilowatt_hour;
    Energy::new::<kilowatt_hour>(v)
}

#[inline]
pub fn watts(v: f64) -> Power {
    use uom::si::power::watt;
    Power::new::<watt>(v)
}

#[inline]
pub fn m3(v: f64) -> Volume {
    use uom::si::volume::cubic_meter;
    Volume::new::<cubic_meter>(v)
}

#[inline]
pub fn m3ps(v: f64) -> VolumeRate {
    use uom::si::volume_rate::cubic_meter_per_second;
    VolumeRate::new::<cubic_meter_per_second>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[inline]
pub fn minutes(v: f64) -> Time {
    use uom::si::time::minute;
    Time::new::<minute>(v)
}

/// Scalar accessors in the canonical boundary units.
pub mod scalar {
    use super::*;

    #[inline]
    pub fn as_watts(p: Power) -> f64 {
        p.get::<uom::si::power::watt>()
    }

    #[inline]
    pub fn as_joules(e: Energy) -> f64 {
        e.get::<uom::si::energy::joule>()
    }

    #[inline]
    pub fn as_kwh(e: Energy) -> f64 {
        e.get::<uom::si::energy::kilowatt_hour>()
    }

    #[inline]
    pub fn as_m3(v: Volume) -> f64 {
        v.get::<uom::si::volume::cubic_meter>()
    }

    #[inline]
    pub fn as_m3ps(q: VolumeRate) -> f64 {
        q.get::<uom::si::volume_rate::cubic_meter_per_second>()
    }

    #[inline]
    pub fn as_seconds(t: Time) -> f64 {
        t.get::<uom::si::time::second>()
    }
}

#[cfg(test)]
mod tests {
    use super::scalar::*;
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _e = joules(3_600.0);
        let _p = watts(1_500.0);
        let _v = m3(2.0);
        let _q = m3ps(0.01);
        let _dt = s(0.1);
    }

    #[test]
    fn kwh_is_3_6_megajoules() {
        assert!((as_joules(kwh(1.0)) - 3.6e6).abs() < 1e-6);
        assert!((as_kwh(joules(7.2e6)) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn minutes_convert_to_seconds() {
        assert!((as_seconds(minutes(5.0)) - 300.0).abs() < 1e-9);
    }
}
