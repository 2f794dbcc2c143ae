use serde::{Deserialize, Serialize};
use std::fmt;

/// A module independent of its version: `group:name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleIdentifier {
    pub group: String,
    pub name: String,
}

impl ModuleIdentifier {
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ModuleIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.name)
    }
}

/// A specific version of a module: `group:name:version`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModuleVersionIdentifier {
    pub group: String,
    pub name: String,
    pub version: String,
}

impl ModuleVersionIdentifier {
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// Parse `"group:name:version"`.
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        match parts.as_slice() {
            [group, name, version]
                if !group.is_empty() && !name.is_empty() && !version.is_empty() =>
            {
                Some(Self::new(*group, *name, *version))
            }
            _ => None,
        }
    }

    pub fn module(&self) -> ModuleIdentifier {
        ModuleIdentifier::new(self.group.clone(), self.name.clone())
    }
}

impl fmt::Display for ModuleVersionIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}

impl TryFrom<String> for ModuleVersionIdentifier {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
            .ok_or_else(|| format!("expected `group:name:version`, found `{value}`"))
    }
}

impl From<ModuleVersionIdentifier> for String {
    fn from(id: ModuleVersionIdentifier) -> Self {
        id.to_string()
    }
}

/// Identity of a selected component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComponentIdentifier {
    /// A published module version.
    Module(ModuleVersionIdentifier),
    /// A project of the build itself, e.g. `:app`.
    Project { path: String },
}

impl ComponentIdentifier {
    pub fn project(path: impl Into<String>) -> Self {
        Self::Project { path: path.into() }
    }
}

impl From<ModuleVersionIdentifier> for ComponentIdentifier {
    fn from(id: ModuleVersionIdentifier) -> Self {
        Self::Module(id)
    }
}

impl fmt::Display for ComponentIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module(id) => id.fmt(f),
            Self::Project { path } => write!(f, "project {path}"),
        }
    }
}

/// What a dependency declaration asked for: `group:name[:version-expression]`.
///
/// The version expression is kept verbatim; it may be empty, exact, a range
/// (`[1.0,2.0)`), a prefix (`1.+`) or `latest.release`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ComponentSelector {
    pub group: String,
    pub name: String,
    pub version: String,
}

impl ComponentSelector {
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// Parse `"group:name"` or `"group:name:version"`.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.splitn(3, ':');
        let group = parts.next().filter(|g| !g.is_empty())?;
        let name = parts.next().filter(|n| !n.is_empty())?;
        let version = parts.next().unwrap_or("");
        if version.contains(':') {
            return None;
        }
        Some(Self::new(group, name, version))
    }

    pub fn module(&self) -> ModuleIdentifier {
        ModuleIdentifier::new(self.group.clone(), self.name.clone())
    }
}

impl From<&ModuleVersionIdentifier> for ComponentSelector {
    fn from(id: &ModuleVersionIdentifier) -> Self {
        Self::new(id.group.clone(), id.name.clone(), id.version.clone())
    }
}

impl fmt::Display for ComponentSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version.is_empty() {
            write!(f, "{}:{}", self.group, self.name)
        } else {
            write!(f, "{}:{}:{}", self.group, self.name, self.version)
        }
    }
}

impl TryFrom<String> for ComponentSelector {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
            .ok_or_else(|| format!("expected `group:name[:version]`, found `{value}`"))
    }
}

impl From<ComponentSelector> for String {
    fn from(selector: ComponentSelector) -> Self {
        selector.to_string()
    }
}
