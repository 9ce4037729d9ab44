//! Command-line interface orchestration for merge-tree queries.
//!
//! Two commands are offered: `maxima` and `component-max`. Each loads a
//! Parquet-backed regular grid or a text mesh, builds the merge tree, and
//! answers one query.

mod commands;

pub use commands::{
    BuildArgs, Cli, CliError, Command, ComponentMaxCommand, ExecutionSummary, FieldSource,
    GridArgs, MaximaCommand, MeshArgs, QueryOutcome, StrategyArg, render_summary, run_cli,
};
