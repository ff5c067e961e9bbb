//! Package record types.

use serde::{Deserialize, Serialize};

/// A single package found on the index.
///
/// Every field is plain text and may be empty. `import_path` identifies the
/// package: two records with the same import path describe the same package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Display name.
    pub name: String,
    /// Import path, the unique identifier.
    pub import_path: String,
    /// Package page on the index.
    pub home_site: String,
    /// One-line description.
    pub synopsis: String,
    /// License label.
    pub license: String,
    /// Imported-by count as displayed.
    pub imported_by: String,
    /// Latest version as displayed.
    pub version: String,
    /// Last published date as displayed.
    pub published: String,
}

impl Package {
    /// Creates a package with a name and import path.
    pub fn new(name: impl Into<String>, import_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            import_path: import_path.into(),
            ..Default::default()
        }
    }

    /// Sets the home site URL.
    pub fn with_home_site(mut self, home_site: impl Into<String>) -> Self {
        self.home_site = home_site.into();
        self
    }

    /// Sets the synopsis.
    pub fn with_synopsis(mut self, synopsis: impl Into<String>) -> Self {
        self.synopsis = synopsis.into();
        self
    }

    /// Sets the license.
    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = license.into();
        self
    }
}
