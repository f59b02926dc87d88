//! Built-in enumerations the CLI can inspect.

use enumkit_core::enumeration;

enumeration! {
    /// ISO weekdays, Monday first.
    pub enum Weekday {
        MONDAY, TUESDAY, WEDNESDAY, THURSDAY, FRIDAY, SATURDAY, SUNDAY,
    }
}

/// Universal gravitational constant (m^3 kg^-1 s^-2).
const G: f64 = 6.673_00E-11;

/// Planets of the solar system with mass (kg) and radius (m).
pub struct Planet {
    mass: f64,
    radius: f64,
}

impl Planet {
    fn new(&(mass, radius): &(f64, f64)) -> Self {
        Planet { mass, radius }
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn surface_gravity(&self) -> f64 {
        G * self.mass / (self.radius * self.radius)
    }
}

enumeration! {
    impl Planet: (f64, f64) = Planet::new {
        MERCURY = (3.303e+23, 2.4397e6),
        VENUS = (4.869e+24, 6.0518e6),
        EARTH = (5.976e+24, 6.37814e6),
        MARS = (6.421e+23, 3.3972e6),
        JUPITER = (1.9e+27, 7.1492e7),
        SATURN = (5.688e+26, 6.0268e7),
        URANUS = (8.686e+25, 2.5559e7),
        NEPTUNE = (1.024e+26, 2.4746e7),
    }
}

/// Names accepted wherever the CLI takes an enumeration type.
pub const CATALOG: &[&str] = &["Weekday", "Planet"];
