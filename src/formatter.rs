//! Rendering of package records as text.

use std::collections::BTreeSet;

use tracing::debug;

use crate::Package;

/// A renderable package field, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Name,
    ImportPath,
    License,
    Synopsis,
    HomeSite,
}

impl Field {
    /// Every field, in display order.
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::ImportPath,
        Field::License,
        Field::Synopsis,
        Field::HomeSite,
    ];

    /// Title shown before the value in verbose output.
    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::ImportPath => "ImportPath",
            Field::License => "License",
            Field::Synopsis => "Synopsis",
            Field::HomeSite => "HomeSite",
        }
    }

    /// Returns this field's value on `package`.
    pub fn value(self, package: &Package) -> &str {
        match self {
            Field::Name => &package.name,
            Field::ImportPath => &package.import_path,
            Field::License => &package.license,
            Field::Synopsis => &package.synopsis,
            Field::HomeSite => &package.home_site,
        }
    }
}

/// Which fields to render and how.
///
/// An empty field selection renders every field. Built once with the
/// builder methods and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderConfig {
    fields: BTreeSet<Field>,
    omit_title: bool,
    omit_empty: bool,
}

impl RenderConfig {
    /// Creates a configuration that renders every field, titles and empty
    /// values included.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts rendering to the given fields.
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Renders values without titles.
    pub fn omit_title(mut self) -> Self {
        self.omit_title = true;
        self
    }

    /// Skips empty values.
    pub fn omit_empty(mut self) -> Self {
        self.omit_empty = true;
        self
    }

    /// Returns whether values are rendered without their `Label: ` prefix.
    pub fn omits_title(&self) -> bool {
        self.omit_title
    }

    /// Returns whether empty values are skipped.
    pub fn omits_empty(&self) -> bool {
        self.omit_empty
    }

    /// Returns whether `field` is selected for rendering.
    pub fn selects(&self, field: Field) -> bool {
        self.fields.is_empty() || self.fields.contains(&field)
    }
}

/// Output style, chosen once per invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// One labeled line per field.
    #[default]
    Verbose,
    /// Name and import path on a single line.
    Compact,
    /// One JSON object per package.
    Json,
}

/// Renders a package as text.
pub trait Formatter: Send + Sync {
    /// Formats one package.
    fn format(&self, package: &Package) -> String;
}

/// Single-line formatter: `name` padded to 16 columns, then the import path.
///
/// Only name and import path are considered. With just one of them
/// selected, that value is rendered alone.
#[derive(Debug, Clone, Default)]
pub struct ShortFormatter {
    config: RenderConfig,
}

impl ShortFormatter {
    /// Creates a short formatter.
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }
}

impl Formatter for ShortFormatter {
    fn format(&self, package: &Package) -> String {
        let name = self.config.selects(Field::Name);
        let import_path = self.config.selects(Field::ImportPath);
        if name && import_path {
            format!("{:<16} {}", package.name, package.import_path)
        } else if import_path {
            package.import_path.clone()
        } else {
            package.name.clone()
        }
    }
}

/// Multi-line formatter with one line per selected field.
#[derive(Debug, Clone, Default)]
pub struct DefaultFormatter {
    config: RenderConfig,
}

impl DefaultFormatter {
    /// Creates a verbose formatter.
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }
}

impl Formatter for DefaultFormatter {
    fn format(&self, package: &Package) -> String {
        let mut out = String::new();
        for field in Field::ALL {
            if !self.config.selects(field) {
                continue;
            }
            let value = field.value(package);
            if self.config.omits_empty() && value.is_empty() {
                continue;
            }
            if !self.config.omits_title() {
                out.push_str(field.label());
                out.push_str(": ");
            }
            out.push_str(value);
            out.push('\n');
        }
        out
    }
}

/// Formatter emitting each package as a compact JSON object.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, package: &Package) -> String {
        match serde_json::to_string(package) {
            Ok(line) => line,
            Err(e) => {
                debug!("Failed to serialize {}: {}", package.import_path, e);
                String::new()
            }
        }
    }
}

/// Builds the formatter for a render mode.
pub fn formatter_for(mode: RenderMode, config: RenderConfig) -> Box<dyn Formatter> {
    match mode {
        RenderMode::Verbose => Box::new(DefaultFormatter::new(config)),
        RenderMode::Compact => Box::new(ShortFormatter::new(config)),
        RenderMode::Json => Box::new(JsonFormatter),
    }
}
