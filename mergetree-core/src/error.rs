//! Error types for the merge-tree core library.
//!
//! Defines the errors surfaced by field accessors and by tree construction,
//! their stable machine-readable codes, and a convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced by [`crate::ScalarField`] or [`crate::NeighborRelation`]
/// accessors.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum FieldError {
    /// Requested vertex was outside the field's domain.
    #[error("vertex {vertex} is outside a domain of {len} vertices")]
    OutOfBounds {
        /// The requested vertex id.
        vertex: usize,
        /// Number of vertices in the domain.
        len: usize,
    },
    /// The field holds no vertices.
    #[error("field contains no vertices")]
    Empty,
    /// The backing storage does not match the declared domain shape.
    #[error("field shape mismatch: expected {expected} values, found {actual}")]
    ShapeMismatch {
        /// Number of values implied by the domain shape.
        expected: usize,
        /// Number of values actually stored.
        actual: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`FieldError`] variants.
    enum FieldErrorCode for FieldError {
        /// Requested vertex was outside the field's domain.
        OutOfBounds => OutOfBounds { .. } => "FIELD_OUT_OF_BOUNDS",
        /// The field holds no vertices.
        Empty => Empty => "FIELD_EMPTY",
        /// The backing storage does not match the declared domain shape.
        ShapeMismatch => ShapeMismatch { .. } => "FIELD_SHAPE_MISMATCH",
    }
}

/// Error type produced while building or querying a [`crate::MergeTree`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum MergeTreeError {
    /// The vertex set selected for analysis is empty.
    #[error("vertex set for field `{field}` is empty")]
    EmptyVertexSet {
        /// Name of the field being analysed.
        field: Arc<str>,
    },
    /// A vertex in the selected set lies outside the field's domain.
    #[error("vertex {vertex} is outside field `{field}` of {len} vertices")]
    VertexOutOfRange {
        /// Name of the field being analysed.
        field: Arc<str>,
        /// The offending vertex id.
        vertex: usize,
        /// Number of vertices in the field.
        len: usize,
    },
    /// The field produced NaN or an infinity, so the vertex order is undefined.
    #[error("vertex {vertex} of field `{field}` has non-finite scalar {value}")]
    NonFiniteScalar {
        /// Name of the field being analysed.
        field: Arc<str>,
        /// The vertex carrying the value.
        vertex: usize,
        /// The non-finite value.
        value: f32,
    },
    /// A neighbor id returned by the relation does not exist in the field.
    #[error("vertex {vertex} of field `{field}` lists neighbor {neighbor} outside {len} vertices")]
    NeighborOutOfDomain {
        /// Name of the field being analysed.
        field: Arc<str>,
        /// Vertex whose neighbor list was inconsistent.
        vertex: usize,
        /// The neighbor id that does not exist.
        neighbor: usize,
        /// Number of vertices in the field.
        len: usize,
    },
    /// A query named a vertex that is not part of the tree.
    #[error("vertex {vertex} is not part of the merge tree")]
    UnknownVertex {
        /// The requested vertex id.
        vertex: usize,
    },
    /// A query threshold was NaN or infinite.
    #[error("query level {level} is not finite")]
    NonFiniteLevel {
        /// The rejected threshold.
        level: f32,
    },
    /// A field accessor failed while the tree was being built.
    #[error("field `{field}` failed: {error}")]
    Field {
        /// Name of the field that failed.
        field: Arc<str>,
        #[source]
        /// Underlying accessor error.
        error: FieldError,
    },
}

define_error_codes! {
    /// Stable codes describing [`MergeTreeError`] variants.
    enum MergeTreeErrorCode for MergeTreeError {
        /// The vertex set selected for analysis is empty.
        EmptyVertexSet => EmptyVertexSet { .. } => "MERGE_TREE_EMPTY_VERTEX_SET",
        /// A vertex in the selected set lies outside the field's domain.
        VertexOutOfRange => VertexOutOfRange { .. } => "MERGE_TREE_VERTEX_OUT_OF_RANGE",
        /// The field produced a non-finite scalar.
        NonFiniteScalar => NonFiniteScalar { .. } => "MERGE_TREE_NON_FINITE_SCALAR",
        /// A neighbor id does not exist in the field.
        NeighborOutOfDomain => NeighborOutOfDomain { .. } => "MERGE_TREE_NEIGHBOR_OUT_OF_DOMAIN",
        /// A query named a vertex outside the tree.
        UnknownVertex => UnknownVertex { .. } => "MERGE_TREE_UNKNOWN_VERTEX",
        /// A query threshold was not finite.
        NonFiniteLevel => NonFiniteLevel { .. } => "MERGE_TREE_NON_FINITE_LEVEL",
        /// A field accessor failed.
        FieldFailure => Field { .. } => "MERGE_TREE_FIELD_FAILURE",
    }
}

impl MergeTreeError {
    /// Retrieve the inner [`FieldErrorCode`] when the error came from a field accessor.
    #[must_use]
    pub const fn field_code(&self) -> Option<FieldErrorCode> {
        match self {
            Self::Field { error, .. } => Some(error.code()),
            _ => None,
        }
    }

    /// Returns `true` for the input-validation family of errors.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::EmptyVertexSet { .. }
                | Self::VertexOutOfRange { .. }
                | Self::NonFiniteScalar { .. }
                | Self::UnknownVertex { .. }
                | Self::NonFiniteLevel { .. }
        )
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, MergeTreeError>;
