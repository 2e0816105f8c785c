// src/bundle/manifest.rs
//! OSGi bundle manifest
//!
//! The manifest is an ordered list of `Name: Value` attributes written in the
//! JAR manifest grammar: CRLF line endings, lines no longer than 72 bytes,
//! overflow carried on continuation lines that start with a single space, and
//! a blank line closing the main section.

use crate::bundle::{BUNDLE_VERSION, bundle_name};
use crate::error::{Error, Result};
use std::io::Write;
use std::path::PathBuf;

/// Location of the manifest inside a bundle
pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

pub const MANIFEST_VERSION: &str = "Manifest-Version";
pub const BUNDLE_MANIFEST_VERSION: &str = "Bundle-ManifestVersion";
pub const BUNDLE_NAME: &str = "Bundle-Name";
pub const BUNDLE_SYMBOLIC_NAME: &str = "Bundle-SymbolicName";
pub const BUNDLE_VERSION_ATTR: &str = "Bundle-Version";
pub const EXPORT_PACKAGE: &str = "Export-Package";
pub const BUNDLE_CLASSPATH: &str = "Bundle-ClassPath";
pub const DYNAMIC_IMPORT_PACKAGE: &str = "DynamicImport-Package";

/// Maximum line length in bytes, excluding the line break
const MAX_LINE_BYTES: usize = 72;

/// Ordered manifest attributes with unique names
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BundleManifest {
    attributes: Vec<(String, String)>,
}

impl BundleManifest {
    /// Look up an attribute value by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate attributes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Packages listed in Export-Package, in declared order
    pub fn exported_packages(&self) -> Vec<&str> {
        self.get(EXPORT_PACKAGE)
            .map(|value| value.split(',').filter(|p| !p.is_empty()).collect())
            .unwrap_or_default()
    }

    fn push(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        if self.get(name).is_some() {
            return Err(Error::validation(format!(
                "manifest attribute {} set twice",
                name
            )));
        }
        self.attributes.push((name.to_string(), value.into()));
        Ok(())
    }

    /// Render the manifest text
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.attributes {
            push_folded(&mut out, &format!("{}: {}", name, value));
        }
        out.push_str("\r\n");
        out
    }

    /// Write the rendered manifest to `writer`
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(self.render().as_bytes())?;
        writer.flush()
    }

    /// Parse the main section of a manifest
    ///
    /// Accepts CRLF or LF line endings and rejoins continuation lines.
    /// Parsing stops at the first blank line after an attribute.
    pub fn parse(text: &str) -> Result<Self> {
        let mut manifest = Self::default();
        let mut current: Option<(String, String)> = None;

        for raw in text.split('\n') {
            let line = raw.strip_suffix('\r').unwrap_or(raw);

            if let Some(continuation) = line.strip_prefix(' ') {
                match current.as_mut() {
                    Some((_, value)) => value.push_str(continuation),
                    None => return Err(malformed("continuation line without attribute")),
                }
                continue;
            }

            if let Some((name, value)) = current.take() {
                manifest
                    .push(&name, value)
                    .map_err(|_| malformed(&format!("duplicate attribute {}", name)))?;
            }

            if line.is_empty() {
                if manifest.is_empty() {
                    continue;
                }
                break;
            }

            let (name, value) = line
                .split_once(": ")
                .or_else(|| line.strip_suffix(':').map(|name| (name, "")))
                .ok_or_else(|| malformed(&format!("expected 'Name: Value', got '{}'", line)))?;
            current = Some((name.to_string(), value.to_string()));
        }

        if let Some((name, value)) = current.take() {
            manifest
                .push(&name, value)
                .map_err(|_| malformed(&format!("duplicate attribute {}", name)))?;
        }

        Ok(manifest)
    }
}

fn malformed(reason: &str) -> Error {
    Error::Format {
        path: PathBuf::from(MANIFEST_PATH),
        reason: reason.to_string(),
    }
}

/// Append `line` with 72-byte folding, never splitting a UTF-8 sequence
fn push_folded(out: &mut String, line: &str) {
    let mut rest = line;
    let mut limit = MAX_LINE_BYTES;

    while rest.len() > limit {
        let mut split = limit;
        while !rest.is_char_boundary(split) {
            split -= 1;
        }
        out.push_str(&rest[..split]);
        out.push_str("\r\n ");
        rest = &rest[split..];
        // continuation lines spend one byte on the leading space
        limit = MAX_LINE_BYTES - 1;
    }

    out.push_str(rest);
    out.push_str("\r\n");
}

/// Computes the manifest for one source archive
///
/// Pure: the same file name, packages and prefix always produce the same
/// attribute list.
#[derive(Debug, Clone, Default)]
pub struct ManifestBuilder {
    prefix: String,
}

impl ManifestBuilder {
    /// Builder with an empty symbolic-name prefix
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the symbolic-name prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Build the manifest for `file_name` exporting `packages`
    pub fn build(&self, file_name: &str, packages: &[String]) -> Result<BundleManifest> {
        let name = bundle_name(file_name)?;
        let symbolic_name = format!("{}{}", self.prefix, name);

        let mut manifest = BundleManifest::default();
        manifest.push(MANIFEST_VERSION, "1.0")?;
        manifest.push(BUNDLE_MANIFEST_VERSION, "2")?;
        manifest.push(BUNDLE_NAME, name)?;
        manifest.push(BUNDLE_SYMBOLIC_NAME, symbolic_name)?;
        manifest.push(BUNDLE_VERSION_ATTR, BUNDLE_VERSION)?;
        manifest.push(EXPORT_PACKAGE, packages.join(","))?;
        manifest.push(BUNDLE_CLASSPATH, format!(".,{}", file_name))?;
        manifest.push(DYNAMIC_IMPORT_PACKAGE, "*")?;
        Ok(manifest)
    }
}
