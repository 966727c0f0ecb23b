use derive_more::{Add, AddAssign, Deref, Display, Div, From, Into, Mul, Sub, SubAssign, Sum};

/// A length in PDF points (1/72 of an inch). All page geometry in this crate is
/// expressed in points, measured from the bottom-left corner of the page.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Mul,
    Div,
    Sum,
    Deref,
    Display,
    From,
    Into,
)]
pub struct Pt(pub f32);

impl Pt {
    /// Build a length from a number of inches
    pub fn from_inches(inches: f32) -> Pt {
        Pt(inches * 72.0)
    }
}
