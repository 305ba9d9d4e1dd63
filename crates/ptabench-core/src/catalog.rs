//! Closed catalogs of analysis variants, benchmark programs and context modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UsageError;

/// A named configuration of the pointer-analysis engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AnalysisVariant {
    /// Context-insensitive.
    #[serde(rename = "insens")]
    Insens,
    #[serde(rename = "1o")]
    Obj1,
    #[serde(rename = "e-1o")]
    EObj1,
    #[serde(rename = "2o")]
    Obj2,
    #[serde(rename = "e-2o")]
    EObj2,
    #[serde(rename = "3o")]
    Obj3,
    #[serde(rename = "e-3o")]
    EObj3,
    #[serde(rename = "1t")]
    Type1,
    #[serde(rename = "e-1t")]
    EType1,
    #[serde(rename = "2t")]
    Type2,
    #[serde(rename = "e-2t")]
    EType2,
    #[serde(rename = "3t")]
    Type3,
    #[serde(rename = "e-3t")]
    EType3,
    #[serde(rename = "p-1p")]
    PPrecise1,
    #[serde(rename = "1p")]
    Precise1,
}

impl AnalysisVariant {
    /// Every variant, in declaration order.
    pub const ALL: [AnalysisVariant; 15] = [
        AnalysisVariant::Insens,
        AnalysisVariant::Obj1,
        AnalysisVariant::EObj1,
        AnalysisVariant::Obj2,
        AnalysisVariant::EObj2,
        AnalysisVariant::Obj3,
        AnalysisVariant::EObj3,
        AnalysisVariant::Type1,
        AnalysisVariant::EType1,
        AnalysisVariant::Type2,
        AnalysisVariant::EType2,
        AnalysisVariant::Type3,
        AnalysisVariant::EType3,
        AnalysisVariant::PPrecise1,
        AnalysisVariant::Precise1,
    ];

    /// Token understood by the engine's `-pta=` flag.
    pub fn token(&self) -> &'static str {
        match self {
            AnalysisVariant::Insens => "insens",
            AnalysisVariant::Obj1 => "1o",
            AnalysisVariant::EObj1 => "e-1o",
            AnalysisVariant::Obj2 => "2o",
            AnalysisVariant::EObj2 => "e-2o",
            AnalysisVariant::Obj3 => "3o",
            AnalysisVariant::EObj3 => "e-3o",
            AnalysisVariant::Type1 => "1t",
            AnalysisVariant::EType1 => "e-1t",
            AnalysisVariant::Type2 => "2t",
            AnalysisVariant::EType2 => "e-2t",
            AnalysisVariant::Type3 => "3t",
            AnalysisVariant::EType3 => "e-3t",
            AnalysisVariant::PPrecise1 => "p-1p",
            AnalysisVariant::Precise1 => "1p",
        }
    }
}

impl fmt::Display for AnalysisVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for AnalysisVariant {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.token() == s)
            .ok_or_else(|| UsageError::UnknownTarget(s.to_string()))
    }
}

/// On-disk packaging of a benchmark's inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchmarkLayout {
    /// `<name>.jar`, `<name>-deps.jar` and `<name>-refl.log` side by side.
    Archive,
    /// One directory per program holding `<jar>.jar` and `<name>-refl.log`.
    Directory {
        /// Base name of the application jar inside the program directory.
        jar: &'static str,
    },
}

/// A target Java program to analyze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BenchmarkProgram {
    #[serde(rename = "antlr")]
    Antlr,
    #[serde(rename = "bloat")]
    Bloat,
    #[serde(rename = "chart")]
    Chart,
    #[serde(rename = "eclipse")]
    Eclipse,
    #[serde(rename = "fop")]
    Fop,
    #[serde(rename = "luindex")]
    Luindex,
    #[serde(rename = "lusearch")]
    Lusearch,
    #[serde(rename = "pmd")]
    Pmd,
    #[serde(rename = "xalan")]
    Xalan,
    #[serde(rename = "checkstyle")]
    Checkstyle,
    #[serde(rename = "findbugs")]
    Findbugs,
    #[serde(rename = "JPC")]
    Jpc,
}

impl BenchmarkProgram {
    /// Every program, in declaration order.
    pub const ALL: [BenchmarkProgram; 12] = [
        BenchmarkProgram::Antlr,
        BenchmarkProgram::Bloat,
        BenchmarkProgram::Chart,
        BenchmarkProgram::Eclipse,
        BenchmarkProgram::Fop,
        BenchmarkProgram::Luindex,
        BenchmarkProgram::Lusearch,
        BenchmarkProgram::Pmd,
        BenchmarkProgram::Xalan,
        BenchmarkProgram::Checkstyle,
        BenchmarkProgram::Findbugs,
        BenchmarkProgram::Jpc,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            BenchmarkProgram::Antlr => "antlr",
            BenchmarkProgram::Bloat => "bloat",
            BenchmarkProgram::Chart => "chart",
            BenchmarkProgram::Eclipse => "eclipse",
            BenchmarkProgram::Fop => "fop",
            BenchmarkProgram::Luindex => "luindex",
            BenchmarkProgram::Lusearch => "lusearch",
            BenchmarkProgram::Pmd => "pmd",
            BenchmarkProgram::Xalan => "xalan",
            BenchmarkProgram::Checkstyle => "checkstyle",
            BenchmarkProgram::Findbugs => "findbugs",
            BenchmarkProgram::Jpc => "JPC",
        }
    }

    /// Packaging family, including the jar-name override for directory-style programs.
    pub fn layout(&self) -> BenchmarkLayout {
        match self {
            BenchmarkProgram::Checkstyle => BenchmarkLayout::Directory {
                jar: "checkstyle-5.7-all",
            },
            BenchmarkProgram::Findbugs => BenchmarkLayout::Directory { jar: "findbugs" },
            BenchmarkProgram::Jpc => BenchmarkLayout::Directory {
                jar: "JPCApplication",
            },
            _ => BenchmarkLayout::Archive,
        }
    }
}

impl fmt::Display for BenchmarkProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for BenchmarkProgram {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.token() == s)
            .ok_or_else(|| UsageError::UnknownTarget(s.to_string()))
    }
}

/// How static-call contexts are resolved by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextMode {
    /// Virtualised context (engine default).
    #[default]
    Default,
    /// Empty context for static calls.
    Empty,
}
