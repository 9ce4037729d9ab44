//! Accessor traits through which the core reads a sampled domain.
//!
//! The core never sees grids, meshes or files. It asks a [`ScalarField`] for
//! one value per vertex and a [`NeighborRelation`] for the vertices adjacent
//! to a vertex, both addressed by global vertex id.

use crate::error::FieldError;

/// One real value per vertex of a domain.
///
/// # Examples
/// ```
/// use mergetree_core::{FieldError, ScalarField};
///
/// struct Line(Vec<f32>);
///
/// impl ScalarField for Line {
///     fn len(&self) -> usize { self.0.len() }
///     fn name(&self) -> &str { "line" }
///     fn scalar(&self, vertex: usize) -> Result<f32, FieldError> {
///         self.0.get(vertex).copied().ok_or(FieldError::OutOfBounds {
///             vertex,
///             len: self.0.len(),
///         })
///     }
/// }
///
/// let field = Line(vec![0.5, 2.0, 1.0]);
/// assert_eq!(field.len(), 3);
/// assert_eq!(field.scalar(1)?, 2.0);
/// assert_eq!(field.scalars(&[2, 0])?, [1.0, 0.5]);
/// # Ok::<(), FieldError>(())
/// ```
pub trait ScalarField {
    /// Number of vertices in the domain. Valid ids are `0..len()`.
    fn len(&self) -> usize;

    /// Returns whether the domain has no vertices.
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Human-readable name used in errors and diagnostics.
    fn name(&self) -> &str;

    /// Returns the value sampled at `vertex`.
    ///
    /// # Errors
    /// Implementations return [`FieldError::OutOfBounds`] for ids outside
    /// `0..len()`.
    fn scalar(&self, vertex: usize) -> Result<f32, FieldError>;

    /// Returns the values of several vertices in the order given.
    ///
    /// Dense implementations may override this with a slice copy.
    ///
    /// # Errors
    /// Propagates the first error returned by [`ScalarField::scalar`].
    fn scalars(&self, vertices: &[usize]) -> Result<Vec<f32>, FieldError> {
        vertices.iter().map(|&vertex| self.scalar(vertex)).collect()
    }
}

/// Adjacency between the vertices of a domain.
///
/// The relation is expected to be symmetric but the core does not rely on it.
///
/// # Examples
/// ```
/// use mergetree_core::{FieldError, NeighborRelation};
///
/// struct Path(usize);
///
/// impl NeighborRelation for Path {
///     fn neighbors(&self, vertex: usize, out: &mut Vec<usize>) -> Result<(), FieldError> {
///         if vertex >= self.0 {
///             return Err(FieldError::OutOfBounds { vertex, len: self.0 });
///         }
///         out.extend(vertex.checked_sub(1));
///         out.extend(Some(vertex + 1).filter(|&next| next < self.0));
///         Ok(())
///     }
/// }
///
/// let mut out = Vec::new();
/// Path(3).neighbors(1, &mut out)?;
/// assert_eq!(out, [0, 2]);
/// # Ok::<(), FieldError>(())
/// ```
pub trait NeighborRelation {
    /// Appends the neighbors of `vertex` to `out`.
    ///
    /// `out` is not cleared, so callers can reuse one buffer across calls.
    ///
    /// # Errors
    /// Implementations return [`FieldError::OutOfBounds`] when `vertex` is
    /// not part of the domain.
    fn neighbors(&self, vertex: usize, out: &mut Vec<usize>) -> Result<(), FieldError>;
}
