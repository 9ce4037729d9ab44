//! Unstructured mesh provider for line-based cell lists.
//!
//! A mesh is a list of vertex scalars and a list of cells. Every pair of
//! vertices that share a cell is an edge of the neighbor relation.
//!
//! The text format holds one record per line:
//!
//! ```text
//! # comment
//! v 0.25        vertex with its scalar, ids assigned in order from 0
//! c 0 1 2       cell listing vertex ids
//! ```
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use mergetree_core::{FieldError, NeighborRelation, ScalarField};
use thiserror::Error;

/// Errors raised while building or parsing a mesh.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MeshProviderError {
    /// The input declared no vertices.
    #[error("mesh has no vertices")]
    EmptyInput,
    /// A cell listed no vertex ids.
    #[error("cell {cell} is empty")]
    EmptyCell { cell: usize },
    /// A cell referenced a vertex that was never declared.
    #[error("cell {cell} references vertex {vertex} but the mesh has {len} vertices")]
    CellVertexOutOfRange { cell: usize, vertex: usize, len: usize },
    /// A line started with a tag other than `v` or `c`.
    #[error("line {line}: unknown record `{tag}`")]
    UnknownRecord { line: usize, tag: String },
    /// A `v` record did not hold exactly one scalar.
    #[error("line {line}: vertex records take exactly one scalar")]
    MalformedVertex { line: usize },
    /// A scalar token could not be parsed.
    #[error("line {line}: `{token}` is not a number")]
    InvalidScalar { line: usize, token: String },
    /// A vertex id token could not be parsed.
    #[error("line {line}: `{token}` is not a vertex id")]
    InvalidVertexId { line: usize, token: String },
    /// Reading the input failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Scalar field on the vertices of an unstructured mesh.
///
/// Adjacency is stored in compressed rows, sorted and free of duplicates.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshGraph {
    name: String,
    scalars: Vec<f32>,
    offsets: Vec<usize>,
    adjacency: Vec<usize>,
    cells: usize,
}

impl MeshGraph {
    /// Builds a mesh from vertex scalars and cells.
    ///
    /// # Examples
    /// ```
    /// use mergetree_core::NeighborRelation;
    /// use mergetree_providers_mesh::MeshGraph;
    ///
    /// let mesh = MeshGraph::try_new("tri", vec![0.0, 1.0, 2.0, 3.0], &[vec![0, 1, 2], vec![2, 3]])?;
    /// let mut out = Vec::new();
    /// mesh.neighbors(2, &mut out)?;
    /// assert_eq!(out, [0, 1, 3]);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    ///
    /// # Errors
    /// Returns [`MeshProviderError::EmptyInput`] without vertices,
    /// [`MeshProviderError::EmptyCell`] for a cell with no ids and
    /// [`MeshProviderError::CellVertexOutOfRange`] for unknown ids.
    pub fn try_new(
        name: impl Into<String>,
        scalars: Vec<f32>,
        cells: &[Vec<usize>],
    ) -> Result<Self, MeshProviderError> {
        if scalars.is_empty() {
            return Err(MeshProviderError::EmptyInput);
        }
        let len = scalars.len();
        let mut rows: Vec<Vec<usize>> = vec![Vec::new(); len];
        for (cell, ids) in cells.iter().enumerate() {
            if ids.is_empty() {
                return Err(MeshProviderError::EmptyCell { cell });
            }
            if let Some(&vertex) = ids.iter().find(|&&id| id >= len) {
                return Err(MeshProviderError::CellVertexOutOfRange { cell, vertex, len });
            }
            for (position, &a) in ids.iter().enumerate() {
                for &b in &ids[position + 1..] {
                    if a != b {
                        rows[a].push(b);
                        rows[b].push(a);
                    }
                }
            }
        }

        let mut offsets = Vec::with_capacity(len + 1);
        let mut adjacency = Vec::new();
        offsets.push(0);
        for mut row in rows {
            row.sort_unstable();
            row.dedup();
            adjacency.extend(row);
            offsets.push(adjacency.len());
        }
        Ok(Self {
            name: name.into(),
            scalars,
            offsets,
            adjacency,
            cells: cells.len(),
        })
    }

    /// Parses the line-based mesh format.
    ///
    /// # Examples
    /// ```
    /// use std::io::Cursor;
    /// use mergetree_core::ScalarField;
    /// use mergetree_providers_mesh::MeshGraph;
    ///
    /// let mesh = MeshGraph::try_from_reader("demo", Cursor::new("v 1\nv 2\nc 0 1\n"))?;
    /// assert_eq!(mesh.len(), 2);
    /// assert_eq!(mesh.edge_count(), 1);
    /// # Ok::<(), mergetree_providers_mesh::MeshProviderError>(())
    /// ```
    ///
    /// # Errors
    /// Returns the parse errors of [`MeshProviderError`] tagged with the
    /// 1-based line number, I/O failures, and the errors of
    /// [`MeshGraph::try_new`].
    pub fn try_from_reader<R>(name: impl Into<String>, reader: R) -> Result<Self, MeshProviderError>
    where
        R: BufRead,
    {
        let mut scalars = Vec::new();
        let mut cells = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line_no = index + 1;
            let line = line?;
            let mut tokens = line.split_whitespace();
            match tokens.next() {
                None => {}
                Some(tag) if tag.starts_with('#') => {}
                Some("v") => scalars.push(parse_vertex(line_no, tokens)?),
                Some("c") => cells.push(
                    tokens
                        .map(|token| parse_id(line_no, token))
                        .collect::<Result<Vec<_>, _>>()?,
                ),
                Some(tag) => {
                    return Err(MeshProviderError::UnknownRecord {
                        line: line_no,
                        tag: tag.to_owned(),
                    });
                }
            }
        }
        Self::try_new(name, scalars, &cells)
    }

    /// Reads a mesh file from `path`.
    ///
    /// # Errors
    /// See [`MeshGraph::try_from_reader`].
    pub fn try_from_path(
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self, MeshProviderError> {
        let file = File::open(path)?;
        Self::try_from_reader(name, BufReader::new(file))
    }

    /// Vertex scalars by id.
    #[must_use]
    #[rustfmt::skip]
    pub fn scalars(&self) -> &[f32] { &self.scalars }

    /// Number of cells the mesh was built from.
    #[must_use]
    #[rustfmt::skip]
    pub fn cell_count(&self) -> usize { self.cells }

    /// Number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.len() / 2
    }

    fn row(&self, vertex: usize) -> Option<&[usize]> {
        let start = *self.offsets.get(vertex)?;
        let end = *self.offsets.get(vertex + 1)?;
        self.adjacency.get(start..end)
    }
}

fn parse_vertex<'a>(
    line: usize,
    mut tokens: impl Iterator<Item = &'a str>,
) -> Result<f32, MeshProviderError> {
    let (Some(token), None) = (tokens.next(), tokens.next()) else {
        return Err(MeshProviderError::MalformedVertex { line });
    };
    token
        .parse()
        .map_err(|_| MeshProviderError::InvalidScalar {
            line,
            token: token.to_owned(),
        })
}

fn parse_id(line: usize, token: &str) -> Result<usize, MeshProviderError> {
    token
        .parse()
        .map_err(|_| MeshProviderError::InvalidVertexId {
            line,
            token: token.to_owned(),
        })
}

impl ScalarField for MeshGraph {
    fn len(&self) -> usize {
        self.scalars.len()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn scalar(&self, vertex: usize) -> Result<f32, FieldError> {
        self.scalars
            .get(vertex)
            .copied()
            .ok_or(FieldError::OutOfBounds {
                vertex,
                len: self.scalars.len(),
            })
    }
}

impl NeighborRelation for MeshGraph {
    fn neighbors(&self, vertex: usize, out: &mut Vec<usize>) -> Result<(), FieldError> {
        let row = self.row(vertex).ok_or(FieldError::OutOfBounds {
            vertex,
            len: self.scalars.len(),
        })?;
        out.extend_from_slice(row);
        Ok(())
    }
}
