#![warn(missing_docs)]
//! Module for additional uom macros that facilitate the creation of single unit values
/// helper macro to create the units
#[macro_export]
macro_rules! uom_unit_creator {
    ($unit:ident, $unit_type:ident, $val1:expr) => {
        $unit_type::new::<$unit>($val1)
    };
}

///macro to create a Length in meter
#[macro_export]
macro_rules! meter {
    ($x:expr) => {{
        use uom::si::{f64::Length, length::meter};
        $crate::uom_unit_creator![meter, Length, $x]
    }};
}
///macro to create a Length in nanometer
#[macro_export]
macro_rules! nanometer {
    ($x:expr) => {{
        use uom::si::{f64::Length, length::nanometer};
        $crate::uom_unit_creator![nanometer, Length, $x]
    }};
}
///macro to create an Angle in radian
#[macro_export]
macro_rules! radian {
    ($x:expr) => {{
        use uom::si::{angle::radian, f64::Angle};
        $crate::uom_unit_creator![radian, Angle, $x]
    }};
}
///macro to create an Angle in degree
#[macro_export]
macro_rules! degree {
    ($x:expr) => {{
        use uom::si::{angle::degree, f64::Angle};
        $crate::uom_unit_creator![degree, Angle, $x]
    }};
}
