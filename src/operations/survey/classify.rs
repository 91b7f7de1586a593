use crate::error::PlanningError;
use crate::geometry::{Polyline, PolylineRole};

/// Indices of the Following and Heading polylines.
///
/// `following[0]` is always the longest polyline; a second entry exists only
/// when an opposite run was found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub following: Vec<usize>,
    pub heading: Vec<usize>,
}

impl Classification {
    /// Index of the longest Following polyline.
    #[must_use]
    pub fn primary(&self) -> Option<usize> {
        self.following.first().copied()
    }

    /// The two Following polylines, if the shape has an opposite run.
    #[must_use]
    pub fn following_pair(&self) -> Option<(usize, usize)> {
        match self.following.as_slice() {
            [first, second, ..] => Some((*first, *second)),
            _ => None,
        }
    }
}

/// Tags each polyline as Following or Heading.
///
/// Expects `polylines` sorted longest first. The longest run is Following.
/// With exactly four runs, the one sharing no vertex with the longest is
/// Following too; every other run is Heading.
///
/// # Errors
///
/// Returns `PlanningError::InsufficientPolylines` for fewer than 2 polylines.
pub fn classify(polylines: &mut [Polyline]) -> Result<Classification, PlanningError> {
    if polylines.len() < 2 {
        return Err(PlanningError::InsufficientPolylines {
            found: polylines.len(),
        });
    }

    let opposite = if polylines.len() == 4 {
        let longest = &polylines[0];
        (1..polylines.len()).find(|&i| !polylines[i].shares_vertex(longest))
    } else {
        None
    };

    let mut classification = Classification::default();
    for (i, polyline) in polylines.iter_mut().enumerate() {
        if i == 0 || Some(i) == opposite {
            polyline.role = Some(PolylineRole::Following);
            classification.following.push(i);
        } else {
            polyline.role = Some(PolylineRole::Heading);
            classification.heading.push(i);
        }
    }
    Ok(classification)
}
