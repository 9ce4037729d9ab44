pub(crate) use super::{GridProviderError, RegularGrid};

mod ingest;
mod support;
