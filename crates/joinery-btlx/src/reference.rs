//! Blank frame and reference sides of a part.
//!
//! The blank frame sits on the most negative long edge of the beam so that
//! every fabrication coordinate is non-negative. The six reference sides
//! are numbered like BTLx `ReferencePlaneID` minus one:
//!
//! | side | origin (blank local)  | x  | y  | normal |
//! |------|-----------------------|----|----|--------|
//! | 0    | (0, 0, 0)             | +x | +z | -y     |
//! | 1    | (0, w, 0)             | +x | -y | -z     |
//! | 2    | (0, w, h)             | +x | -z | +y     |
//! | 3    | (0, 0, h)             | +x | +y | +z     |
//! | 4    | (0, 0, 0)             | +z | +y | -x     |
//! | 5    | (L, w, 0)             | +z | -y | +x     |

use joinery_geom::Frame;
use joinery_math::{angle_between, Point3, Vec3};
use joinery_model::Beam;

use crate::{BtlxError, Result};

/// Resolved reference geometry of one beam.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSides {
    /// Blank frame: corner origin, beam x and y axes.
    pub blank_frame: Frame,
    /// Blank length including extensions.
    pub blank_length: f64,
    /// Cross-section size along y.
    pub width: f64,
    /// Cross-section size along z.
    pub height: f64,
    /// The six reference side frames, outward normals.
    pub sides: [Frame; 6],
}

impl ReferenceSides {
    /// Resolve the blank frame and reference sides of `beam`.
    pub fn from_beam(beam: &Beam) -> Result<Self> {
        let beam_blank = beam.blank_frame();
        let corner_edge = &beam.long_edges()[2];
        let origin = corner_edge.closest_point(&beam_blank.origin)?;
        let (x, y) = (beam.frame.x_axis(), beam.frame.y_axis());
        let blank_frame = Frame::from_orthonormal(origin, x, y);
        let z = blank_frame.normal();

        let (l, w, h) = (beam.blank_length(), beam.width, beam.height);
        let sides = [
            Frame::from_orthonormal(origin, x, z),
            Frame::from_orthonormal(origin + y * w, x, -y),
            Frame::from_orthonormal(origin + y * w + z * h, x, -z),
            Frame::from_orthonormal(origin + z * h, x, y),
            Frame::from_orthonormal(origin, z, y),
            Frame::from_orthonormal(origin + x * l + y * w, z, -y),
        ];
        Ok(Self {
            blank_frame,
            blank_length: l,
            width: w,
            height: h,
            sides,
        })
    }

    /// Reference side by zero-based index.
    pub fn side(&self, index: usize) -> &Frame {
        &self.sides[index]
    }

    /// Extent of a side along its local y-axis.
    pub fn side_width(&self, index: usize) -> f64 {
        match index {
            0 | 2 => self.height,
            _ => self.width,
        }
    }

    /// Index of the side among `candidates` whose normal makes the smallest
    /// angle with `direction`. Ties go to the lower index.
    pub fn closest_side(&self, direction: &Vec3, candidates: std::ops::Range<usize>) -> Result<usize> {
        let mut best: Option<(usize, f64)> = None;
        for index in candidates {
            let angle = angle_between(&self.sides[index].normal(), direction)
                .ok_or_else(|| BtlxError::GeometryDegenerate("zero-length direction".into()))?;
            if best.map_or(true, |(_, a)| angle < a) {
                best = Some((index, angle));
            }
        }
        best.map(|(index, _)| index)
            .ok_or_else(|| BtlxError::GeometryDegenerate("no reference side to choose from".into()))
    }

    /// The eight corners of the blank box in blank-local coordinates.
    pub fn blank_corners(&self) -> [Point3; 8] {
        let (l, w, h) = (self.blank_length, self.width, self.height);
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(l, 0.0, 0.0),
            Point3::new(l, w, 0.0),
            Point3::new(0.0, w, 0.0),
            Point3::new(0.0, 0.0, h),
            Point3::new(l, 0.0, h),
            Point3::new(l, w, h),
            Point3::new(0.0, w, h),
        ]
    }
}
