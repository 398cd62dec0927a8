//! File Entries
//!
//! A `FileEntry` is one resolved file: its absolute path, the key it is
//! displayed and matched by, and the payload produced by hydration.

use crate::error::InvokeError;
use crate::Category;
use serde_json::Value;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Path information for a file, independent of its payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    /// Absolute, lexically normalized path
    pub path: PathBuf,
    /// Working directory the path was resolved against
    pub cwd: PathBuf,
    /// Registry category
    pub category: Category,
}

impl FileMeta {
    /// Resolve `path` against `cwd`
    pub fn new(category: Category, cwd: &Path, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            cwd.join(path)
        };
        Self {
            path: normalize(&joined),
            cwd: cwd.to_path_buf(),
            category,
        }
    }

    /// File name without its final extension
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// File name including extension
    pub fn basename(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Final extension, without the dot
    pub fn extension(&self) -> Option<&str> {
        self.path.extension().and_then(|e| e.to_str())
    }

    /// Path relative to `cwd`, or the absolute path when outside it
    pub fn relative(&self) -> PathBuf {
        self.path
            .strip_prefix(&self.cwd)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| self.path.clone())
    }

    /// Relative path with `/` separators on every platform
    pub fn relative_slash(&self) -> String {
        to_slash(&self.relative())
    }

    /// Parent directory
    pub fn dirname(&self) -> PathBuf {
        self.path.parent().map(Path::to_path_buf).unwrap_or_default()
    }

    /// Read a named property, as used by [`RenameRule::Property`]
    pub fn property(&self, name: &str) -> Option<String> {
        match name {
            "stem" => Some(self.stem()),
            "basename" | "name" => Some(self.basename()),
            "extension" | "extname" => Some(self.extension().unwrap_or_default().to_string()),
            "relative" => Some(self.relative_slash()),
            "path" => Some(to_slash(&self.path)),
            "dirname" => Some(to_slash(&self.dirname())),
            _ => None,
        }
    }
}

pub(crate) fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// How an entry's key is derived from its path
#[derive(Clone, Default)]
pub enum RenameRule {
    /// File stem (`fixtures/short.txt` → `short`)
    #[default]
    Stem,
    /// Named property of [`FileMeta`] (`basename`, `relative`, ...)
    Property(String),
    /// Custom function
    Custom(Arc<dyn Fn(&FileMeta) -> String + Send + Sync>),
}

impl RenameRule {
    /// Rule reading a [`FileMeta`] property; `None` for unknown property names
    pub fn property(name: &str) -> Option<Self> {
        const KNOWN: [&str; 8] = [
            "stem", "basename", "name", "extension", "extname", "relative", "path", "dirname",
        ];
        KNOWN
            .contains(&name)
            .then(|| RenameRule::Property(name.to_string()))
    }

    /// Rule backed by a function
    pub fn custom(f: impl Fn(&FileMeta) -> String + Send + Sync + 'static) -> Self {
        RenameRule::Custom(Arc::new(f))
    }

    /// Compute the key for `meta`
    pub fn key_for(&self, meta: &FileMeta) -> String {
        match self {
            RenameRule::Stem => meta.stem(),
            RenameRule::Property(name) => meta.property(name).unwrap_or_else(|| meta.stem()),
            RenameRule::Custom(f) => f(meta),
        }
    }
}

impl fmt::Debug for RenameRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenameRule::Stem => write!(f, "Stem"),
            RenameRule::Property(name) => f.debug_tuple("Property").field(name).finish(),
            RenameRule::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl std::str::FromStr for RenameRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RenameRule::property(s).ok_or_else(|| format!("Unknown rename property: {}", s))
    }
}

/// Decoded fixture content
#[derive(Debug, Clone, PartialEq)]
pub enum FixtureContent {
    /// `.json` files, parsed
    Json(Value),
    /// Any other UTF-8 file
    Text(String),
    /// Non UTF-8 data
    Binary(Vec<u8>),
}

/// Hydrated fixture payload
#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    /// Decoded content
    pub content: FixtureContent,
    /// Size of the file in bytes
    pub size: usize,
}

impl Fixture {
    /// Decode raw file bytes, choosing a representation by extension
    pub fn decode(meta: &FileMeta, bytes: Vec<u8>) -> Result<Self, String> {
        let size = bytes.len();
        let content = match meta.extension() {
            Some("json") => {
                let value = serde_json::from_slice(&bytes)
                    .map_err(|e| format!("invalid JSON fixture: {}", e))?;
                FixtureContent::Json(value)
            }
            _ => match String::from_utf8(bytes) {
                Ok(text) => FixtureContent::Text(text),
                Err(e) => FixtureContent::Binary(e.into_bytes()),
            },
        };
        Ok(Self { content, size })
    }

    /// Human-readable size, e.g. `(42 bytes)`
    pub fn size_label(&self) -> String {
        format!("({} bytes)", self.size)
    }

    /// Arguments a candidate is invoked with.
    ///
    /// A JSON array spreads into positional arguments; text is a single
    /// string argument (none when empty); binary content yields no arguments.
    pub fn args(&self) -> Vec<Value> {
        match &self.content {
            FixtureContent::Json(Value::Array(items)) => items.clone(),
            FixtureContent::Json(Value::Null) => Vec::new(),
            FixtureContent::Json(value) => vec![value.clone()],
            FixtureContent::Text(text) if text.is_empty() => Vec::new(),
            FixtureContent::Text(text) => vec![Value::String(text.clone())],
            FixtureContent::Binary(_) => Vec::new(),
        }
    }

    /// Split a JSON-array fixture into `(args, expected)`, the last element being expected
    pub fn split_expected(&self) -> Option<(Vec<Value>, Value)> {
        match &self.content {
            FixtureContent::Json(Value::Array(items)) => {
                let (expected, args) = items.split_last()?;
                Some((args.to_vec(), expected.clone()))
            }
            _ => None,
        }
    }
}

/// Input passed to a candidate on each invocation
#[derive(Debug, Clone, Copy)]
pub struct InvokeInput<'a> {
    /// Absolute path of the fixture file
    pub fixture_path: &'a Path,
    /// Hydrated fixture
    pub fixture: &'a Fixture,
    /// Positional arguments
    pub args: &'a [Value],
}

/// A loaded candidate implementation
pub trait Invoke: Send + Sync {
    /// Run the candidate once
    fn invoke(&self, input: &InvokeInput<'_>) -> Result<Value, InvokeError>;
}

impl<F> Invoke for F
where
    F: Fn(&InvokeInput<'_>) -> Result<Value, InvokeError> + Send + Sync,
{
    fn invoke(&self, input: &InvokeInput<'_>) -> Result<Value, InvokeError> {
        self(input)
    }
}

/// Shared handle to a candidate
pub type Candidate = Arc<dyn Invoke>;

/// Wrap a closure as a [`Candidate`]
pub fn candidate_fn<F>(f: F) -> Candidate
where
    F: Fn(&InvokeInput<'_>) -> Result<Value, InvokeError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Category-specific payload produced by hydration
#[derive(Clone)]
pub enum Payload {
    /// Fixture content
    Fixture(Fixture),
    /// Loaded candidate
    Code(Candidate),
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Fixture(fixture) => f.debug_tuple("Fixture").field(fixture).finish(),
            Payload::Code(_) => write!(f, "Code(..)"),
        }
    }
}

/// One registered file
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Path information
    pub meta: FileMeta,
    /// Display and match identity
    pub key: String,
    /// Mapping key the entry was registered under, if any
    pub alias: Option<String>,
    /// Hydrated payload
    pub payload: Payload,
}

impl FileEntry {
    /// Absolute path
    pub fn path(&self) -> &Path {
        &self.meta.path
    }

    /// Registry category
    pub fn category(&self) -> Category {
        self.meta.category
    }

    /// Fixture payload, if this is a fixture
    pub fn fixture(&self) -> Option<&Fixture> {
        match &self.payload {
            Payload::Fixture(fixture) => Some(fixture),
            Payload::Code(_) => None,
        }
    }

    /// Candidate payload, if this is a code entry
    pub fn candidate(&self) -> Option<&Candidate> {
        match &self.payload {
            Payload::Code(candidate) => Some(candidate),
            Payload::Fixture(_) => None,
        }
    }

    /// Size label for fixtures, empty for code
    pub fn size_label(&self) -> String {
        self.fixture().map(Fixture::size_label).unwrap_or_default()
    }
}

impl fmt::Display for FileEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = match self.meta.category {
            Category::Fixture => "Fixture",
            Category::Code => "Code",
        };
        write!(
            f,
            "<{} {} \"{}\">",
            title,
            self.key,
            self.meta.relative_slash()
        )
    }
}
