//! # System Models
//!
//! A [`SystemModel`] is what a [`ModelReader`] produces from one feeder's
//! entry-point file. The publish pipeline treats it as opaque: it only asks
//! the model to serialize itself into the versioned output directory.
//!
//! The crate ships [`dss::DssReader`] for OpenDSS scripts. Other readers plug
//! in through the trait, which is also how tests inject failing readers.

use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub mod dss;

pub use dss::DssReader;

/// Reads a feeder's entry-point file into a [`SystemModel`].
pub trait ModelReader {
    /// Parse the model rooted at `entry_point`.
    fn read(&self, entry_point: &Path) -> Result<SystemModel>;
}

impl<R: ModelReader + ?Sized> ModelReader for &R {
    fn read(&self, entry_point: &Path) -> Result<SystemModel> {
        (**self).read(entry_point)
    }
}

/// One named property of a component, in definition order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: String,
}

/// An element of the network such as a line, load or transformer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Lowercase element class, e.g. `line`.
    pub class: String,
    /// Element name as written in the script.
    pub name: String,
    pub properties: Vec<Property>,
}

impl Component {
    pub fn new(class: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            name: name.into(),
            properties: Vec::new(),
        }
    }

    /// `class.name`, lowercased, used to look components up.
    pub fn key(&self) -> String {
        format!("{}.{}", self.class, self.name.to_lowercase())
    }

    /// Last value assigned to `name`, matched case-insensitively.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .rev()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .map(|p| p.value.as_str())
    }
}

/// In-memory representation of one parsed feeder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemModel {
    /// Circuit name.
    pub name: String,
    /// Entry-point file the model was read from.
    pub source: String,
    /// Options assigned with `Set`, sorted by key.
    pub settings: std::collections::BTreeMap<String, String>,
    /// Components in the order they were first defined.
    pub components: Vec<Component>,
}

impl SystemModel {
    /// Find a component by class and name, case-insensitively.
    pub fn component(&self, class: &str, name: &str) -> Option<&Component> {
        self.components
            .iter()
            .find(|c| c.class.eq_ignore_ascii_case(class) && c.name.eq_ignore_ascii_case(name))
    }

    /// Number of components of `class`.
    pub fn count(&self, class: &str) -> usize {
        self.components
            .iter()
            .filter(|c| c.class.eq_ignore_ascii_case(class))
            .count()
    }

    /// Write the model as pretty JSON to `writer`.
    pub fn write_json<W: Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, self)
    }

    /// Write the model as pretty JSON to `path`, replacing any existing file.
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .map_err(|e| Error::filesystem("create", path, e))?;
        let mut writer = BufWriter::new(file);
        self.write_json(&mut writer)
            .map_err(|source| Error::Serialization {
                path: path.to_path_buf(),
                source,
            })?;
        writer
            .flush()
            .map_err(|e| Error::filesystem("write", path, e))?;
        Ok(())
    }
}
