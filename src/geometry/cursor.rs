//! Pull-based geometry sources.
//!
//! [`GeometryCursor`] is the capability spatial pipelines depend on. The
//! shapefile reader implements it, as do the in-memory and filtering cursors
//! defined here, so a pipeline can be fed from any of them interchangeably.

use super::Geometry;
use crate::error::Result;

/// Forward-only source of geometries.
pub trait GeometryCursor {
    /// Whether another pull may produce a geometry.
    ///
    /// Must be free of side effects and safe to call repeatedly.
    fn has_next(&self) -> bool;

    /// Produce the next geometry, or `Ok(None)` at the end of the sequence.
    fn next_geometry(&mut self) -> Result<Option<Geometry>>;

    /// Identifier of the geometry most recently returned by
    /// [`next_geometry`](Self::next_geometry).
    ///
    /// The value before the first successful pull is unspecified.
    fn geometry_id(&self) -> i32;

    /// Drain the cursor into a vector, stopping at the first error.
    fn collect_all(&mut self) -> Result<Vec<Geometry>>
    where
        Self: Sized,
    {
        let mut out = Vec::new();
        while let Some(geometry) = self.next_geometry()? {
            out.push(geometry);
        }
        Ok(out)
    }
}

impl<C: GeometryCursor + ?Sized> GeometryCursor for Box<C> {
    fn has_next(&self) -> bool {
        (**self).has_next()
    }

    fn next_geometry(&mut self) -> Result<Option<Geometry>> {
        (**self).next_geometry()
    }

    fn geometry_id(&self) -> i32 {
        (**self).geometry_id()
    }
}

impl<C: GeometryCursor + ?Sized> GeometryCursor for &mut C {
    fn has_next(&self) -> bool {
        (**self).has_next()
    }

    fn next_geometry(&mut self) -> Result<Option<Geometry>> {
        (**self).next_geometry()
    }

    fn geometry_id(&self) -> i32 {
        (**self).geometry_id()
    }
}

/// Cursor over an in-memory list of geometries.
///
/// Ids are the 0-based positions of the geometries in the list.
#[derive(Debug, Clone, Default)]
pub struct SimpleGeometryCursor {
    geometries: Vec<Geometry>,
    index: usize,
}

impl SimpleGeometryCursor {
    /// Create a cursor over `geometries`, in order.
    pub fn new(geometries: Vec<Geometry>) -> Self {
        Self {
            geometries,
            index: 0,
        }
    }

    /// Number of geometries not yet pulled
    pub fn remaining(&self) -> usize {
        self.geometries.len() - self.index
    }
}

impl From<Vec<Geometry>> for SimpleGeometryCursor {
    fn from(geometries: Vec<Geometry>) -> Self {
        Self::new(geometries)
    }
}

impl GeometryCursor for SimpleGeometryCursor {
    fn has_next(&self) -> bool {
        self.index < self.geometries.len()
    }

    fn next_geometry(&mut self) -> Result<Option<Geometry>> {
        match self.geometries.get(self.index) {
            Some(geometry) => {
                self.index += 1;
                Ok(Some(geometry.clone()))
            }
            None => Ok(None),
        }
    }

    fn geometry_id(&self) -> i32 {
        self.index as i32 - 1
    }
}

/// Cursor yielding only the geometries of an inner cursor that match a predicate.
///
/// Ids are passed through from the inner cursor. `has_next` reports the inner
/// cursor's state, so a `true` answer may still be followed by `Ok(None)` when
/// no remaining geometry matches.
pub struct FilteredGeometryCursor<C, F> {
    inner: C,
    predicate: F,
}

impl<C, F> FilteredGeometryCursor<C, F>
where
    C: GeometryCursor,
    F: FnMut(&Geometry) -> bool,
{
    /// Wrap `inner`, keeping geometries for which `predicate` returns `true`.
    pub fn new(inner: C, predicate: F) -> Self {
        Self { inner, predicate }
    }

    /// Release the wrapped cursor
    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C, F> GeometryCursor for FilteredGeometryCursor<C, F>
where
    C: GeometryCursor,
    F: FnMut(&Geometry) -> bool,
{
    fn has_next(&self) -> bool {
        self.inner.has_next()
    }

    fn next_geometry(&mut self) -> Result<Option<Geometry>> {
        while let Some(geometry) = self.inner.next_geometry()? {
            if (self.predicate)(&geometry) {
                return Ok(Some(geometry));
            }
        }
        Ok(None)
    }

    fn geometry_id(&self) -> i32 {
        self.inner.geometry_id()
    }
}
