use derive_more::{
    Add, AddAssign, Display, Div, DivAssign, From, Into, Mul, MulAssign, Neg,
    Sub, SubAssign, Sum,
};
use serde::{Deserialize, Serialize};
use std::{iter, ops};

/// Unit used for planar lengths on the canvas. All point coordinates are
/// expressed in pixels, so any length that gets compared or combined with a
/// planar distance has to be converted to this first.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    PartialEq,
    PartialOrd,
    From,
    Into,
    Neg,
    Add,
    Sub,
    Mul,
    Div,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    Sum,
    Serialize,
    Deserialize,
)]
#[display(fmt = "{} px", "self.0")]
pub struct Pixels(pub f64);

/// Unit used for elevation changes. One cell of elevation is as tall as one
/// grid cell is wide, so a token that climbs one cell while moving one cell
/// sideways has travelled the same distance in both axes.
///
/// Elevation is always tracked as a whole number of cells. Arithmetic
/// saturates at the bounds of `i32` rather than overflowing, since counts can
/// come straight from user input.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    From,
    Into,
    Serialize,
    Deserialize,
)]
#[display(fmt = "{} cells", "self.0")]
pub struct Cells(pub i32);

impl Cells {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1);

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// -1, 0 or 1, depending on the direction of the elevation change
    pub fn signum(self) -> i32 {
        self.0.signum()
    }

    /// Convert a cell count to a planar length, using the size of a single
    /// grid cell.
    pub fn to_pixels(self, cell_size: Pixels) -> Pixels {
        cell_size * f64::from(self.0)
    }
}

impl ops::Neg for Cells {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(self.0.saturating_neg())
    }
}

impl ops::Add for Cells {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl ops::Sub for Cells {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl ops::AddAssign for Cells {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl ops::SubAssign for Cells {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl iter::Sum for Cells {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, ops::Add::add)
    }
}

// 1 cell * n px/cell = n px
impl ops::Mul<Pixels> for Cells {
    type Output = Pixels;

    fn mul(self, rhs: Pixels) -> Self::Output {
        self.to_pixels(rhs)
    }
}
