//! Scalability prediction from exclusion tables.
//!
//! Each context mode has its own table of (variant → programs) combinations
//! measured to be intractable. Tables are validated when loaded: every key and
//! member must be a catalog token, a variant may appear at most once per
//! table, and a program may appear at most once per variant.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::catalog::{AnalysisVariant, BenchmarkProgram, ContextMode};
use crate::error::ExclusionError;

const EMBEDDED_TABLES: &str = include_str!("../data/exclusions.json");

/// Programs known to be unscalable, per variant.
pub type ExclusionTable = BTreeMap<AnalysisVariant, BTreeSet<BenchmarkProgram>>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTables {
    default: RawTable,
    empty: RawTable,
}

/// One table's entries in document order, repeated keys included.
#[derive(Debug)]
struct RawTable(Vec<(AnalysisVariant, Vec<BenchmarkProgram>)>);

impl<'de> Deserialize<'de> for RawTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RawTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map from analysis variant to benchmark programs")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawTable, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry()? {
                    entries.push(entry);
                }
                Ok(RawTable(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// The pair of exclusion tables, one per [`ContextMode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionTables {
    default: ExclusionTable,
    empty: ExclusionTable,
}

impl ExclusionTables {
    /// Tables compiled into the binary.
    pub fn embedded() -> Result<Self, ExclusionError> {
        Self::from_json(EMBEDDED_TABLES)
    }

    /// Load a table document from disk.
    pub fn from_file(path: &Path) -> Result<Self, ExclusionError> {
        let text = std::fs::read_to_string(path).map_err(|source| ExclusionError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parse and validate a table document.
    pub fn from_json(text: &str) -> Result<Self, ExclusionError> {
        let raw: RawTables = serde_json::from_str(text)?;
        Ok(Self {
            default: validate("default", raw.default)?,
            empty: validate("empty", raw.empty)?,
        })
    }

    pub fn table(&self, mode: ContextMode) -> &ExclusionTable {
        match mode {
            ContextMode::Default => &self.default,
            ContextMode::Empty => &self.empty,
        }
    }
}

fn validate(mode: &'static str, raw: RawTable) -> Result<ExclusionTable, ExclusionError> {
    let mut table = ExclusionTable::new();
    for (variant, programs) in raw.0 {
        if table.contains_key(&variant) {
            return Err(ExclusionError::DuplicateVariant {
                mode,
                variant: variant.to_string(),
            });
        }
        let mut set = BTreeSet::new();
        for program in programs {
            if !set.insert(program) {
                return Err(ExclusionError::DuplicateEntry {
                    mode,
                    variant: variant.to_string(),
                    program: program.to_string(),
                });
            }
        }
        table.insert(variant, set);
    }
    Ok(table)
}

/// Answers "is this job known to be unscalable?" for one fixed context mode.
#[derive(Debug, Clone)]
pub struct ScalabilityPredictor {
    mode: ContextMode,
    table: ExclusionTable,
}

impl ScalabilityPredictor {
    /// Select the active table once for the whole run.
    pub fn new(tables: &ExclusionTables, mode: ContextMode) -> Self {
        Self {
            mode,
            table: tables.table(mode).clone(),
        }
    }

    pub fn mode(&self) -> ContextMode {
        self.mode
    }

    /// True iff `program` is listed under `variant` in the active table.
    pub fn predict(&self, variant: AnalysisVariant, program: BenchmarkProgram) -> bool {
        self.table
            .get(&variant)
            .is_some_and(|programs| programs.contains(&program))
    }
}
