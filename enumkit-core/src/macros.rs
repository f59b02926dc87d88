//! `enumeration!` declarative macro.
//!
//! Two forms:
//!
//! ```rust,ignore
//! // Unit variants: the macro defines the type itself.
//! enumeration! {
//!     pub enum Weekday { MONDAY, TUESDAY, WEDNESDAY }
//! }
//!
//! // Payload variants: the type is yours, the macro wires the table.
//! pub struct Planet { mass: f64, radius: f64 }
//! impl Planet {
//!     fn new(&(mass, radius): &(f64, f64)) -> Self { Planet { mass, radius } }
//! }
//! enumeration! {
//!     impl Planet: (f64, f64) = Planet::new {
//!         MERCURY = (3.303e+23, 2.4397e6),
//!         VENUS = (4.869e+24, 6.0518e6),
//!     }
//! }
//! ```
//!
//! Both forms add one accessor per variant, named after it
//! (`Weekday::MONDAY()`), returning the singleton.

#[macro_export]
macro_rules! enumeration {
    (@accessors $vis:vis $name:ident { $($variant:ident),+ }) => {
        #[allow(non_snake_case, dead_code)]
        impl $name {
            $(
                $vis fn $variant() -> &'static $crate::Variant<$name> {
                    $crate::registry::declared::<$name>(stringify!($variant))
                }
            )+
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident { $($variant:ident),+ $(,)? }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            _sealed: (),
        }

        impl $crate::Enumeration for $name {
            const NAME: &'static str = stringify!($name);
            type Payload = ();

            fn declare() -> ::std::vec::Vec<(&'static str, ())> {
                ::std::vec![$((stringify!($variant), ())),+]
            }

            fn construct(_: &()) -> Self {
                $name { _sealed: () }
            }
        }

        $crate::enumeration!(@accessors $vis $name { $($variant),+ });
    };

    (
        impl $name:ident: $payload:ty = $ctor:path {
            $($variant:ident = $value:expr),+ $(,)?
        }
    ) => {
        impl $crate::Enumeration for $name {
            const NAME: &'static str = stringify!($name);
            type Payload = $payload;

            fn declare() -> ::std::vec::Vec<(&'static str, $payload)> {
                ::std::vec![$((stringify!($variant), $value)),+]
            }

            fn construct(payload: &$payload) -> Self {
                $ctor(payload)
            }
        }

        $crate::enumeration!(@accessors pub $name { $($variant),+ });
    };
}
