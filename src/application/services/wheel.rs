//! Flavor wheel service
//!
//! Reads delimited flavor taxonomies and folds them into the three-level
//! hierarchy consumed by sunburst charts.

use std::collections::HashMap;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::render;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{
    BuildStats, ColumnNames, DomainError, HierarchyBuilder, LeafOrder, Row, TreeNode, ROOT_LABEL,
};
use crate::infrastructure::traits::FileSystem;

/// Path argument that selects stdin instead of a file.
pub const STDIN_PATH: &str = "-";

/// Output from building a flavor hierarchy.
#[derive(Debug, Clone)]
pub struct WheelOutput {
    /// Root of the emitted hierarchy
    pub tree: TreeNode,
    /// Counters gathered while folding rows
    pub stats: BuildStats,
}

/// Parsing and emission options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WheelOptions {
    pub root_label: String,
    pub columns: ColumnNames,
    pub leaf_order: LeafOrder,
    pub delimiter: u8,
}

impl Default for WheelOptions {
    fn default() -> Self {
        Self {
            root_label: ROOT_LABEL.to_string(),
            columns: ColumnNames::default(),
            leaf_order: LeafOrder::default(),
            delimiter: b',',
        }
    }
}

impl WheelOptions {
    pub fn from_settings(settings: &Settings) -> ApplicationResult<Self> {
        Ok(Self {
            root_label: settings.root_label.clone(),
            columns: settings.columns.clone(),
            leaf_order: settings.leaf_order,
            delimiter: settings.delimiter_byte()?,
        })
    }
}

/// Service for turning flavor CSV files into hierarchies.
pub struct WheelService {
    fs: Arc<dyn FileSystem>,
    options: WheelOptions,
}

impl WheelService {
    /// Create a new wheel service.
    pub fn new(fs: Arc<dyn FileSystem>, options: WheelOptions) -> Self {
        Self { fs, options }
    }

    /// Build the hierarchy from a file, or from stdin when `path` is `-`.
    pub fn load(&self, path: &Path) -> ApplicationResult<WheelOutput> {
        debug!("load: path={}", path.display());
        if path == Path::new(STDIN_PATH) {
            let mut content = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut content)
                .with_context("read stdin")?;
            return self.parse(content.as_slice());
        }

        let content = self
            .fs
            .read(path)
            .with_path_context("read flavor csv", path)?;
        self.parse(content.as_slice())
    }

    /// Build the hierarchy from any CSV stream with a header row.
    ///
    /// The configured columns must all appear in the header; other columns
    /// are ignored. Any missing field or unparsable record aborts the build.
    #[instrument(level = "debug", skip(self, reader))]
    pub fn parse<R: Read>(&self, reader: R) -> ApplicationResult<WheelOutput> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(self.options.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let builder =
            HierarchyBuilder::with_root(&self.options.root_label).leaf_order(self.options.leaf_order);

        let headers = csv_reader.headers()?;
        if headers.is_empty() {
            debug!("parse: empty input");
            let (tree, stats) = builder.finish();
            return Ok(WheelOutput { tree, stats });
        }
        let positions = self.column_positions(headers)?;
        let columns = &self.options.columns;

        // Records stop at the first read error, which is reported after the fold.
        let mut read_error = None;
        let rows = csv_reader
            .records()
            .map_while(|record| match record {
                Ok(record) => Some(record),
                Err(e) => {
                    read_error = Some(e);
                    None
                }
            })
            .map(|record| {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                Row::from_lookup(
                    |name| positions.get(name).and_then(|&idx| record.get(idx)),
                    columns,
                    line,
                )
            });
        let builder = builder.extend_rows(rows)?;
        if let Some(e) = read_error {
            return Err(e.into());
        }

        let (tree, stats) = builder.finish();
        debug!(
            "parse: rows={} outer={} middle={} leaves={}",
            stats.rows, stats.outer, stats.middle, stats.leaves
        );
        Ok(WheelOutput { tree, stats })
    }

    /// Write the hierarchy as JSON, replacing `path` atomically.
    pub fn write_json(&self, tree: &TreeNode, path: &Path, pretty: bool) -> ApplicationResult<()> {
        debug!("write_json: path={}, pretty={}", path.display(), pretty);
        let json = render::to_json(tree, pretty)?;
        self.fs
            .ensure_parent(path)
            .with_path_context("create output directory", path)?;
        self.fs
            .write_atomic(path, &json)
            .with_path_context("write json", path)
    }

    /// Map each configured column name to its index in the header.
    ///
    /// A name repeated in the header resolves to its last occurrence.
    fn column_positions(
        &self,
        headers: &csv::StringRecord,
    ) -> ApplicationResult<HashMap<String, usize>> {
        let mut positions = HashMap::new();
        for name in self.options.columns.as_array() {
            let last = headers
                .iter()
                .enumerate()
                .filter(|(_, h)| *h == name)
                .map(|(idx, _)| idx)
                .last();
            let idx = last.ok_or_else(|| {
                ApplicationError::Domain(DomainError::MissingField {
                    field: name.to_string(),
                    line: 1,
                })
            })?;
            positions.insert(name.to_string(), idx);
        }
        Ok(positions)
    }
}
