//! Function database: built-in function signatures loaded from JSON.
//!
//! The database is a JSON array of signature records:
//!
//! ```json
//! [
//!   {
//!     "name": "GetPlayerScore",
//!     "arguments": [{ "name": "player", "type": "int" }],
//!     "return": { "name": "score", "type": "int" },
//!     "description": "Current score of a player.",
//!     "notes": ""
//!   }
//! ]
//! ```
//!
//! It is read once at startup and never mutated. [`catalog::Catalog`] turns it into completion entries.
//!
//! ## Modules
//!
//! - `catalog` - Static completion entries (keywords, then database functions) with their details

pub mod catalog;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub use catalog::{Catalog, CatalogEntry, EntryKind};

/// Environment variable consulted when no database path is given on the command line.
pub const FUNCTIONS_ENV: &str = "BHS_FUNCTIONS";

/// Errors that occur while loading the function database
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("failed to read function database {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid function database {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One argument of a built-in function. An empty `ty` means the argument is untyped.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Argument {
    pub name: String,
    #[serde(rename = "type", default)]
    pub ty: String,
}

/// Return value of a built-in function. A name without a type is a `free` return.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReturnValue {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub ty: Option<String>,
}

/// A built-in function signature.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FunctionSignature {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<Argument>,
    #[serde(rename = "return", default)]
    pub returns: ReturnValue,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notes: String,
}

impl FunctionSignature {
    /// Completion label, `name(a1, a2)`.
    pub fn label(&self) -> String {
        let args: Vec<&str> = self.arguments.iter().map(|a| a.name.as_str()).collect();
        format!("{}({})", self.name, args.join(", "))
    }

    /// Snippet insert text, `name(${1:a1}, ${2:a2})`.
    pub fn snippet(&self) -> String {
        bhs_syntax::symbol::snippet(&self.name, self.arguments.iter().map(|a| a.name.as_str()))
    }

    /// One-line signature, `(function) name(a1: t1, a2): ret`.
    pub fn detail(&self) -> String {
        let args: Vec<String> = self
            .arguments
            .iter()
            .map(|a| {
                if a.ty.is_empty() {
                    a.name.clone()
                } else {
                    format!("{}: {}", a.name, a.ty)
                }
            })
            .collect();

        let mut detail = format!("(function) {}({})", self.name, args.join(", "));
        if let Some(ty) = &self.returns.ty {
            detail.push_str(&format!(": {}", ty));
        } else if self.returns.name.is_some() {
            detail.push_str(": free");
        }
        detail
    }

    /// Markdown documentation: description and notes, then the parameter and return block.
    pub fn documentation(&self) -> String {
        let prose: Vec<&str> = [self.description.as_str(), self.notes.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        let mut doc = prose.join("\n\n");

        if !self.arguments.is_empty() {
            let params: Vec<String> = self
                .arguments
                .iter()
                .map(|a| {
                    if a.ty.is_empty() {
                        format!("_@param_ `{}`", a.name)
                    } else {
                        format!("_@param_ `{}` `{}`", a.ty, a.name)
                    }
                })
                .collect();
            doc.push_str("\n\n");
            doc.push_str(&params.join("  \n"));
        }

        if let Some(name) = &self.returns.name {
            doc.push_str("\n\n");
            match &self.returns.ty {
                Some(ty) => doc.push_str(&format!("_@return_ `{}` `{}`", ty, name)),
                None => doc.push_str(&format!("_@return_ `{}`", name)),
            }
        }

        doc.trim_start_matches('\n').to_string()
    }
}

/// Parse a database from JSON text.
pub fn parse(json: &str) -> Result<Vec<FunctionSignature>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Load the database at `path`.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load(path: &Path) -> Result<Vec<FunctionSignature>, DatabaseError> {
    let json = fs::read_to_string(path).map_err(|source| DatabaseError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let signatures = parse(&json).map_err(|source| DatabaseError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(count = signatures.len(), "loaded function database");
    Ok(signatures)
}

/// Pick the database path: an explicit path wins over [`FUNCTIONS_ENV`].
pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(FUNCTIONS_ENV).filter(|v| !v.is_empty()).map(PathBuf::from))
}
