use crate::units::Pt;

/// Margins around the drawable area of a page. The top and left margins place the
/// first line of every page, and the bottom margin is the threshold below which no
/// line is ever drawn. All four are written out as the `ArtBox` of each
/// [`Page`](crate::Page).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Margins {
    pub top: Pt,
    pub right: Pt,
    pub bottom: Pt,
    pub left: Pt,
}

impl Margins {
    /// Create margins by specifying individual components in a clockwise fashion
    /// starting at the top (in the same order as CSS margins)
    pub fn trbl(top: Pt, right: Pt, bottom: Pt, left: Pt) -> Margins {
        Margins {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Create margins where all values are equal
    pub fn all<D: Into<Pt>>(value: D) -> Margins {
        let value: Pt = value.into();
        Margins {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Create margins by specifying different values for vertical (top and bottom)
    /// and horizontal (left and right) margins
    pub fn symmetric(vertical: Pt, horizontal: Pt) -> Margins {
        Margins {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    /// Whether every margin is a finite, non-negative length
    pub fn is_valid(&self) -> bool {
        [self.top, self.right, self.bottom, self.left]
            .iter()
            .all(|m| m.0.is_finite() && m.0 >= 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_follow_css_order() {
        let m = Margins::trbl(Pt(1.0), Pt(2.0), Pt(3.0), Pt(4.0));
        assert_eq!((m.top, m.right, m.bottom, m.left), (Pt(1.0), Pt(2.0), Pt(3.0), Pt(4.0)));
        assert_eq!(Margins::symmetric(Pt(72.0), Pt(36.0)), Margins::trbl(Pt(72.0), Pt(36.0), Pt(72.0), Pt(36.0)));
        assert_eq!(Margins::all(Pt(72.0)), Margins::symmetric(Pt(72.0), Pt(72.0)));
    }

    #[test]
    fn negative_margins_are_invalid() {
        assert!(Margins::all(Pt(72.0)).is_valid());
        assert!(!Margins::trbl(Pt(72.0), Pt(-1.0), Pt(72.0), Pt(72.0)).is_valid());
        assert!(!Margins::all(Pt(f32::NAN)).is_valid());
    }
}
