//! Command implementations and argument parsing for the mergetree CLI.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use mergetree_core::{
    BridgeSet, MergeTree, MergeTreeBuilder, MergeTreeError, NeighborRelation, ScalarField,
    SweepStrategy, VertexSet,
};
use mergetree_providers_grid::{GridProviderError, RegularGrid};
use mergetree_providers_mesh::{MeshGraph, MeshProviderError};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "mergetree", about = "Build merge trees of scalar fields and query them.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Report the local maxima of the field.
    Maxima(MaximaCommand),
    /// Report the highest vertex of a super-level component.
    ComponentMax(ComponentMaxCommand),
}

/// Options accepted by the `maxima` command.
#[derive(Debug, Args, Clone)]
pub struct MaximaCommand {
    /// Seam edge `A:B` to a neighboring partition; its lower endpoint is not
    /// reported. May be repeated.
    #[arg(long = "bridge", value_name = "A:B", value_parser = parse_bridge)]
    pub bridges: Vec<(usize, usize)>,

    /// Build options.
    #[command(flatten)]
    pub build: BuildArgs,

    /// Field to analyse.
    #[command(subcommand)]
    pub source: FieldSource,
}

/// Options accepted by the `component-max` command.
#[derive(Debug, Args, Clone)]
pub struct ComponentMaxCommand {
    /// Vertex whose component is searched.
    #[arg(long)]
    pub vertex: usize,

    /// Threshold of the super-level set.
    #[arg(long, allow_negative_numbers = true)]
    pub level: f32,

    /// Build options.
    #[command(flatten)]
    pub build: BuildArgs,

    /// Field to analyse.
    #[command(subcommand)]
    pub source: FieldSource,
}

/// Options shared by every command that builds a tree.
#[derive(Debug, Args, Clone, Default)]
pub struct BuildArgs {
    /// Restrict the build to these vertex ids (defaults to the whole field).
    #[arg(long, value_delimiter = ',')]
    pub vertices: Vec<usize>,

    /// How the join and split sweeps are scheduled.
    #[arg(long, value_enum, default_value_t = StrategyArg::Concurrent)]
    pub strategy: StrategyArg,
}

/// Sweep scheduling choices exposed on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Run the join and split sweeps one after the other.
    Sequential,
    /// Run the sweeps concurrently when the core supports it.
    #[default]
    Concurrent,
}

impl From<StrategyArg> for SweepStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Sequential => Self::Sequential,
            StrategyArg::Concurrent => Self::Concurrent,
        }
    }
}

/// Input fields supported by the CLI.
#[derive(Debug, Subcommand, Clone)]
pub enum FieldSource {
    /// Regular grid with scalars in a Parquet `Float32` column.
    Grid(GridArgs),
    /// Unstructured mesh in the line-based `v`/`c` text format.
    Mesh(MeshArgs),
}

/// Grid ingestion arguments.
#[derive(Debug, Args, Clone)]
pub struct GridArgs {
    /// Path to the Parquet file holding one row per grid point.
    pub path: PathBuf,

    /// Column containing the `Float32` scalars.
    #[arg(long)]
    pub column: String,

    /// Grid extents as `NX,NY,NZ`, x varying fastest.
    #[arg(long, value_name = "NX,NY,NZ", value_parser = parse_dims)]
    pub dims: [usize; 3],

    /// Override name for the field (defaults to the file name).
    #[arg(long)]
    pub name: Option<String>,
}

/// Mesh ingestion arguments.
#[derive(Debug, Args, Clone)]
pub struct MeshArgs {
    /// Path to the mesh file.
    pub path: PathBuf,

    /// Override name for the field (defaults to the file name).
    #[arg(long)]
    pub name: Option<String>,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// File I/O failed while opening an input.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Grid ingestion failed.
    #[error(transparent)]
    Grid(#[from] GridProviderError),
    /// Mesh ingestion failed.
    #[error(transparent)]
    Mesh(#[from] MeshProviderError),
    /// A bridge named a vertex outside the tree.
    #[error("bridge {a}:{b} names a vertex outside the merge tree")]
    BridgeOutsideTree {
        /// First endpoint as given.
        a: usize,
        /// Second endpoint as given.
        b: usize,
    },
    /// Building or querying the tree failed.
    #[error(transparent)]
    Core(#[from] MergeTreeError),
}

/// Result of a query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// Vertices reported by the maxima query, ascending.
    Maxima(Vec<usize>),
    /// Answer of the component-maximum query.
    ComponentMax {
        /// Query vertex.
        vertex: usize,
        /// Query threshold.
        level: f32,
        /// Highest vertex of the component.
        maximum: usize,
        /// Scalar at `maximum`.
        scalar: f32,
    },
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionSummary {
    /// Name of the analysed field.
    pub field: String,
    /// Vertices in the tree.
    pub vertices: usize,
    /// Edges of the merge forest.
    pub edges: usize,
    /// Roots of the merge forest.
    pub roots: usize,
    /// Query answer.
    pub outcome: QueryOutcome,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading, building or querying fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use mergetree_cli::cli::{BuildArgs, Cli, Command, FieldSource, MaximaCommand, MeshArgs, QueryOutcome, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "v 1\nv 0\nv 2\nc 0 1\nc 1 2\n")?;
/// let cli = Cli {
///     command: Command::Maxima(MaximaCommand {
///         bridges: Vec::new(),
///         build: BuildArgs::default(),
///         source: FieldSource::Mesh(MeshArgs {
///             path: file.path().to_path_buf(),
///             name: None,
///         }),
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.outcome, QueryOutcome::Maxima(vec![0, 2]));
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Maxima(command) => {
            span.record("command", field::display("maxima"));
            run_maxima(command)
        }
        Command::ComponentMax(command) => {
            span.record("command", field::display("component-max"));
            run_component_max(command)
        }
    }
}

pub(super) fn run_maxima(command: MaximaCommand) -> Result<ExecutionSummary, CliError> {
    let MaximaCommand {
        bridges,
        build,
        source,
    } = command;
    execute(source, &build, |tree| {
        let bridges = bridges
            .into_iter()
            .map(|(a, b)| {
                tree.orient_bridge(a, b)
                    .ok_or(CliError::BridgeOutsideTree { a, b })
            })
            .collect::<Result<BridgeSet, _>>()?;
        Ok(QueryOutcome::Maxima(tree.maxima_query(&bridges)))
    })
}

pub(super) fn run_component_max(command: ComponentMaxCommand) -> Result<ExecutionSummary, CliError> {
    let ComponentMaxCommand {
        vertex,
        level,
        build,
        source,
    } = command;
    execute(source, &build, |tree| {
        let maximum = tree.component_maximum_query(vertex, level)?;
        let scalar = tree
            .scalar(maximum)
            .ok_or(MergeTreeError::UnknownVertex { vertex: maximum })?;
        Ok(QueryOutcome::ComponentMax {
            vertex,
            level,
            maximum,
            scalar,
        })
    })
}

#[instrument(
    name = "cli.execute",
    err,
    skip(source, build, query),
    fields(source = field::Empty, strategy = ?build.strategy, selected = build.vertices.len()),
)]
pub(super) fn execute(
    source: FieldSource,
    build: &BuildArgs,
    query: impl FnOnce(&MergeTree) -> Result<QueryOutcome, CliError>,
) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    let (name, tree) = match source {
        FieldSource::Grid(args) => {
            span.record("source", field::display("grid"));
            let grid = load_grid(args)?;
            (grid.name().to_owned(), build_tree(&grid, build)?)
        }
        FieldSource::Mesh(args) => {
            span.record("source", field::display("mesh"));
            let mesh = load_mesh(args)?;
            (mesh.name().to_owned(), build_tree(&mesh, build)?)
        }
    };

    let outcome = query(&tree)?;
    let summary = ExecutionSummary {
        field: name,
        vertices: tree.len(),
        edges: tree.edge_count(),
        roots: tree.roots().count(),
        outcome,
    };
    info!(
        field = summary.field.as_str(),
        vertices = summary.vertices,
        roots = summary.roots,
        "command completed"
    );
    Ok(summary)
}

fn build_tree<F>(field: &F, build: &BuildArgs) -> Result<MergeTree, CliError>
where
    F: ScalarField + NeighborRelation,
{
    let mut builder = MergeTreeBuilder::new().with_sweep_strategy(build.strategy.into());
    if !build.vertices.is_empty() {
        builder = builder.with_vertex_set(VertexSet::from_ids(build.vertices.iter().copied()));
    }
    Ok(builder.build(field, field)?)
}

#[instrument(
    name = "cli.load_grid",
    err,
    skip(args),
    fields(path = field::Empty, column = field::Empty, override_name = field::Empty),
)]
pub(super) fn load_grid(args: GridArgs) -> Result<RegularGrid, CliError> {
    let GridArgs {
        path,
        column,
        dims,
        name,
    } = args;
    let span = Span::current();
    span.record("path", field::display(path.display()));
    span.record("column", field::display(&column));
    span.record(
        "override_name",
        field::display(name.as_deref().unwrap_or("<derived>")),
    );
    let chosen_name = derive_field_name(&path, name.as_deref());
    Ok(RegularGrid::try_from_parquet_path(
        chosen_name,
        &path,
        &column,
        dims,
    )?)
}

#[instrument(
    name = "cli.load_mesh",
    err,
    skip(args),
    fields(path = field::Empty, override_name = field::Empty),
)]
pub(super) fn load_mesh(args: MeshArgs) -> Result<MeshGraph, CliError> {
    let MeshArgs { path, name } = args;
    let span = Span::current();
    span.record("path", field::display(path.display()));
    span.record(
        "override_name",
        field::display(name.as_deref().unwrap_or("<derived>")),
    );
    let chosen_name = derive_field_name(&path, name.as_deref());
    let reader = open_mesh_reader(&path)?;
    Ok(MeshGraph::try_from_reader(chosen_name, reader)?)
}

#[instrument(name = "cli.open_mesh_reader", err, fields(path = field::Empty))]
pub(super) fn open_mesh_reader(path: &Path) -> Result<BufReader<File>, CliError> {
    Span::current().record("path", field::display(path.display()));
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

pub(super) fn derive_field_name(path: &Path, override_name: Option<&str>) -> String {
    if let Some(name) = override_name {
        return name.to_owned();
    }

    path.file_stem()
        .and_then(|value| value.to_str())
        .map_or_else(|| "field".to_owned(), ToOwned::to_owned)
}

pub(super) fn parse_bridge(raw: &str) -> Result<(usize, usize), String> {
    let (a, b) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected `A:B`, found `{raw}`"))?;
    let parse = |token: &str| {
        token
            .trim()
            .parse::<usize>()
            .map_err(|err| format!("invalid vertex id `{token}`: {err}"))
    };
    Ok((parse(a)?, parse(b)?))
}

pub(super) fn parse_dims(raw: &str) -> Result<[usize; 3], String> {
    let extents = raw
        .split(',')
        .map(|token| {
            token
                .trim()
                .parse::<usize>()
                .map_err(|err| format!("invalid extent `{token}`: {err}"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    <[usize; 3]>::try_from(extents)
        .map_err(|extents| format!("expected 3 extents, found {}", extents.len()))
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use mergetree_cli::cli::{ExecutionSummary, QueryOutcome, render_summary};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary {
///     field: "demo".into(),
///     vertices: 3,
///     edges: 2,
///     roots: 1,
///     outcome: QueryOutcome::Maxima(vec![0, 2]),
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert!(String::from_utf8(buffer)?.ends_with("maxima: 2\n0\n2\n"));
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "field: {}", summary.field)?;
    writeln!(writer, "vertices: {}", summary.vertices)?;
    writeln!(writer, "edges: {}", summary.edges)?;
    writeln!(writer, "roots: {}", summary.roots)?;
    match &summary.outcome {
        QueryOutcome::Maxima(maxima) => {
            writeln!(writer, "maxima: {}", maxima.len())?;
            for vertex in maxima {
                writeln!(writer, "{vertex}")?;
            }
        }
        QueryOutcome::ComponentMax {
            vertex,
            level,
            maximum,
            scalar,
        } => {
            writeln!(writer, "component of {vertex} above {level}: {maximum}\t{scalar}")?;
        }
    }
    Ok(())
}
