use serde::{Deserialize, Serialize};

/// A longitude/latitude position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        LngLat { lng, lat }
    }
}

/// Rectangular lon/lat extent. A fresh accumulator is empty until extended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub minx: f64,
    pub miny: f64,
    pub maxx: f64,
    pub maxy: f64,
}

impl Bounds {
    pub fn empty() -> Self {
        Bounds {
            minx: f64::INFINITY,
            miny: f64::INFINITY,
            maxx: f64::NEG_INFINITY,
            maxy: f64::NEG_INFINITY,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.minx <= self.maxx && self.miny <= self.maxy)
    }

    pub fn extend(&mut self, point: LngLat) {
        // NaN never compares, so it simply leaves the extent untouched
        self.minx = self.minx.min(point.lng);
        self.miny = self.miny.min(point.lat);
        self.maxx = self.maxx.max(point.lng);
        self.maxy = self.maxy.max(point.lat);
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            minx: self.minx.min(other.minx),
            miny: self.miny.min(other.miny),
            maxx: self.maxx.max(other.maxx),
            maxy: self.maxy.max(other.maxy),
        }
    }

    pub fn contains(&self, point: LngLat) -> bool {
        point.lng >= self.minx
            && point.lng <= self.maxx
            && point.lat >= self.miny
            && point.lat <= self.maxy
    }

    pub fn min(&self) -> LngLat {
        LngLat::new(self.minx, self.miny)
    }

    pub fn max(&self) -> LngLat {
        LngLat::new(self.maxx, self.maxy)
    }

    pub fn center(&self) -> LngLat {
        LngLat::new(
            (self.minx + self.maxx) / 2.0,
            (self.miny + self.maxy) / 2.0,
        )
    }
}

impl From<(f64, f64, f64, f64)> for Bounds {
    fn from(extent: (f64, f64, f64, f64)) -> Self {
        Bounds {
            minx: extent.0,
            miny: extent.1,
            maxx: extent.2,
            maxy: extent.3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_accumulator_is_empty() {
        assert!(Bounds::empty().is_empty());
    }

    #[test]
    fn single_point_collapses_extent() {
        let mut b = Bounds::empty();
        b.extend(LngLat::new(10.0, 20.0));
        assert!(!b.is_empty());
        assert_eq!(b.min(), LngLat::new(10.0, 20.0));
        assert_eq!(b.max(), LngLat::new(10.0, 20.0));
    }

    #[test]
    fn union_covers_both() {
        let a = Bounds::from((0.0, 0.0, 1.0, 1.0));
        let b = Bounds::from((-5.0, 0.5, 0.5, 3.0));
        assert_eq!(a.union(&b), Bounds::from((-5.0, 0.0, 1.0, 3.0)));
        assert!(a.union(&b).contains(LngLat::new(-4.0, 2.0)));
        assert_eq!(a.center(), LngLat::new(0.5, 0.5));
    }
}
