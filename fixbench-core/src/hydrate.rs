//! Hydration
//!
//! Turning a resolved path into a payload. Fixtures are read and decoded;
//! code files are handed to a [`CodeResolver`], which decides what "loading"
//! a candidate means.

use crate::entry::{Candidate, FileMeta, Fixture, Invoke, InvokeInput, Payload, candidate_fn};
use crate::error::{InvokeError, ResourceLoadError};
use fxhash::FxHashMap;
use serde_json::Value;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;

/// Category-specific loader injected into a registry
pub trait Hydrate: Send + Sync {
    /// Load the payload for `meta`
    fn hydrate(&self, meta: &FileMeta) -> Result<Payload, ResourceLoadError>;
}

/// Reads fixture files from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureHydrator;

impl Hydrate for FixtureHydrator {
    fn hydrate(&self, meta: &FileMeta) -> Result<Payload, ResourceLoadError> {
        let bytes = std::fs::read(&meta.path)
            .map_err(|e| ResourceLoadError::new(meta.category, &meta.path, e))?;
        let fixture = Fixture::decode(meta, bytes)
            .map_err(|e| ResourceLoadError::new(meta.category, &meta.path, e))?;
        Ok(Payload::Fixture(fixture))
    }
}

/// Loads a code file into a callable candidate
pub trait CodeResolver: Send + Sync {
    /// Resolve `meta` into a candidate
    fn resolve(&self, meta: &FileMeta) -> Result<Candidate, ResourceLoadError>;
}

/// Hydrates code entries through a [`CodeResolver`]
#[derive(Clone)]
pub struct CodeHydrator {
    resolver: Arc<dyn CodeResolver>,
}

impl CodeHydrator {
    /// Wrap a resolver
    pub fn new(resolver: Arc<dyn CodeResolver>) -> Self {
        Self { resolver }
    }
}

impl Hydrate for CodeHydrator {
    fn hydrate(&self, meta: &FileMeta) -> Result<Payload, ResourceLoadError> {
        self.resolver.resolve(meta).map(Payload::Code)
    }
}

/// Interpreters used when none are configured
pub fn default_interpreters() -> FxHashMap<String, String> {
    [("js", "node"), ("py", "python3"), ("rb", "ruby"), ("sh", "sh")]
        .into_iter()
        .map(|(ext, cmd)| (ext.to_string(), cmd.to_string()))
        .collect()
}

/// Runs code files as scripts.
///
/// Each invocation spawns `[interpreter] <script> <fixture>` and writes the
/// arguments to stdin as a JSON array. Trimmed stdout is the result, parsed
/// as JSON when it parses.
#[derive(Debug, Clone)]
pub struct CommandResolver {
    interpreters: FxHashMap<String, String>,
}

impl Default for CommandResolver {
    fn default() -> Self {
        Self::new(default_interpreters())
    }
}

impl CommandResolver {
    /// Resolver with an explicit extension → command table
    pub fn new(interpreters: FxHashMap<String, String>) -> Self {
        Self { interpreters }
    }

    /// Add or replace the interpreter for `extension`
    pub fn with_interpreter(mut self, extension: &str, command: &str) -> Self {
        self.interpreters
            .insert(extension.to_string(), command.to_string());
        self
    }

    /// Command line prefix for `meta`
    fn command_for(&self, meta: &FileMeta) -> Vec<String> {
        let mut argv: Vec<String> = meta
            .extension()
            .and_then(|ext| self.interpreters.get(ext))
            .map(|cmd| cmd.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        argv.push(meta.path.to_string_lossy().into_owned());
        argv
    }
}

impl CodeResolver for CommandResolver {
    fn resolve(&self, meta: &FileMeta) -> Result<Candidate, ResourceLoadError> {
        if !meta.path.is_file() {
            return Err(ResourceLoadError::new(
                meta.category,
                &meta.path,
                "no such file",
            ));
        }
        let argv = self.command_for(meta);
        tracing::debug!("Resolved {} as `{}`", meta.basename(), argv.join(" "));
        Ok(Arc::new(ScriptCandidate {
            argv,
            cwd: meta.cwd.clone(),
        }))
    }
}

struct ScriptCandidate {
    argv: Vec<String>,
    cwd: PathBuf,
}

impl Invoke for ScriptCandidate {
    fn invoke(&self, input: &InvokeInput<'_>) -> Result<Value, InvokeError> {
        let (program, rest) = self
            .argv
            .split_first()
            .ok_or_else(|| InvokeError::Failed("empty command line".to_string()))?;

        let mut child = Command::new(program)
            .args(rest)
            .arg(input.fixture_path)
            .current_dir(&self.cwd)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| InvokeError::Spawn {
                program: program.clone(),
                source,
            })?;

        let payload = serde_json::to_vec(input.args)
            .map_err(|e| InvokeError::Failed(format!("failed to encode arguments: {}", e)))?;
        let writer = child.stdin.take().map(|mut stdin| {
            std::thread::spawn(move || match stdin.write_all(&payload) {
                Err(e) if e.kind() != ErrorKind::BrokenPipe => Err(e),
                _ => Ok(()),
            })
        });

        let output = child.wait_with_output()?;
        if let Some(handle) = writer {
            handle
                .join()
                .map_err(|_| InvokeError::Failed("stdin writer panicked".to_string()))??;
        }

        if !output.status.success() {
            return Err(InvokeError::Exit {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stdout = stdout.trim();
        Ok(serde_json::from_str(stdout).unwrap_or_else(|_| Value::String(stdout.to_string())))
    }
}

/// In-process candidates looked up by file stem
#[derive(Clone, Default)]
pub struct FnResolver {
    table: FxHashMap<String, Candidate>,
}

impl FnResolver {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a candidate under `name`
    pub fn register(mut self, name: &str, candidate: Candidate) -> Self {
        self.table.insert(name.to_string(), candidate);
        self
    }

    /// Register a plain function of the fixture arguments
    pub fn register_fn<F>(self, name: &str, f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.register(name, candidate_fn(move |input| Ok(f(input.args))))
    }
}

impl CodeResolver for FnResolver {
    fn resolve(&self, meta: &FileMeta) -> Result<Candidate, ResourceLoadError> {
        let stem = meta.stem();
        self.table.get(&stem).cloned().ok_or_else(|| {
            ResourceLoadError::new(
                meta.category,
                &meta.path,
                format!("no function registered for '{}'", stem),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Category;
    use crate::entry::FixtureContent;
    use serde_json::json;

    #[test]
    fn test_fixture_hydrator_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("short.txt"), "abc").unwrap();
        let meta = FileMeta::new(Category::Fixture, dir.path(), "short.txt");

        match FixtureHydrator.hydrate(&meta).unwrap() {
            Payload::Fixture(fixture) => {
                assert_eq!(fixture.content, FixtureContent::Text("abc".into()));
                assert_eq!(fixture.size, 3);
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_fixture_hydrator_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let meta = FileMeta::new(Category::Fixture, dir.path(), "missing.txt");
        let err = FixtureHydrator.hydrate(&meta).unwrap_err();
        assert_eq!(err.category, Category::Fixture);
        assert!(err.path.ends_with("missing.txt"));
    }

    #[test]
    fn test_fn_resolver_by_stem() {
        let resolver = FnResolver::new().register_fn("len", |args| {
            json!(args.first().and_then(Value::as_str).map_or(0, str::len))
        });
        let dir = tempfile::tempdir().unwrap();
        let meta = FileMeta::new(Category::Code, dir.path(), "code/len.js");
        let candidate = resolver.resolve(&meta).unwrap();

        let fixture = Fixture {
            content: FixtureContent::Text("abcd".into()),
            size: 4,
        };
        let args = fixture.args();
        let input = InvokeInput {
            fixture_path: &meta.path,
            fixture: &fixture,
            args: &args,
        };
        assert_eq!(candidate.invoke(&input).unwrap(), json!(4));

        let missing = FileMeta::new(Category::Code, dir.path(), "code/other.js");
        assert!(resolver.resolve(&missing).is_err());
    }

    #[test]
    fn test_command_resolver_requires_file() {
        let dir = tempfile::tempdir().unwrap();
        let meta = FileMeta::new(Category::Code, dir.path(), "nope.js");
        assert!(CommandResolver::default().resolve(&meta).is_err());
    }

    #[test]
    fn test_command_line_uses_interpreter() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = CommandResolver::default().with_interpreter("ts", "deno run");
        let meta = FileMeta::new(Category::Code, dir.path(), "a.ts");
        let argv = resolver.command_for(&meta);
        assert_eq!(&argv[..2], ["deno", "run"]);
        assert!(argv[2].ends_with("a.ts"));

        let bare = FileMeta::new(Category::Code, dir.path(), "run.bin");
        assert_eq!(resolver.command_for(&bare).len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_command_candidate_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("echo.sh"), "cat\n").unwrap();
        std::fs::write(dir.path().join("in.json"), "[1, 2]").unwrap();
        let meta = FileMeta::new(Category::Code, dir.path(), "echo.sh");
        let candidate = CommandResolver::default().resolve(&meta).unwrap();

        let fixture_meta = FileMeta::new(Category::Fixture, dir.path(), "in.json");
        let fixture = Fixture::decode(&fixture_meta, b"[1, 2]".to_vec()).unwrap();
        let args = fixture.args();
        let input = InvokeInput {
            fixture_path: &fixture_meta.path,
            fixture: &fixture,
            args: &args,
        };
        assert_eq!(candidate.invoke(&input).unwrap(), json!([1, 2]));
    }
}
