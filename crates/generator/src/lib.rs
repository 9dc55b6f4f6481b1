//! Registry source emission
//!
//! Renders a compiled [`Registry`] into the single source file the
//! hand-written service classes import: one configuration object per service
//! plus the shared path resolver and operation invoker.
//!
//! Output is deterministic. Services keep catalog order and operations are
//! sorted by method name, so regenerating from the same input produces the
//! same bytes.

mod templates;

use opreg_common::{CompilerError, Registry, Result};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tera::Tera;
use tracing::info;

/// Language of the generated registry file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    TypeScript,
    Rust,
}

impl Target {
    pub fn template_name(&self) -> &'static str {
        match self {
            Target::TypeScript => "registry.ts",
            Target::Rust => "registry.rs",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::TypeScript => write!(f, "TypeScript"),
            Target::Rust => write!(f, "Rust"),
        }
    }
}

#[derive(Debug, Serialize)]
struct ServiceContext<'a> {
    name: &'a str,
    base_path: &'a str,
    operations: Vec<OperationContext<'a>>,
}

#[derive(Debug, Serialize)]
struct OperationContext<'a> {
    name: &'a str,
    method: &'static str,
    operation_id: &'a str,
    path: Option<&'a str>,
}

/// Registry emitter
///
/// Renders a [`Registry`] for one [`Target`] and writes it without ever
/// leaving a partial file behind.
pub struct RegistryEmitter {
    target: Target,
    tera: Tera,
}

impl RegistryEmitter {
    /// Create a new emitter for `target`
    pub fn new(target: Target) -> Result<Self> {
        let tera = templates::load_templates(target)?;
        Ok(Self { target, tera })
    }

    pub fn target(&self) -> Target {
        self.target
    }

    /// Render the registry source
    pub fn render(&self, registry: &Registry) -> Result<String> {
        let context = self.create_context(registry);
        self.tera
            .render(self.target.template_name(), &context)
            .map_err(|e| CompilerError::Generation(format!("Template error: {:?}", e)))
    }

    /// Render and write the registry to `output`
    ///
    /// The content goes to a temporary file in the destination directory
    /// first and is renamed over `output` only once fully written.
    pub fn write(&self, registry: &Registry, output: &Path) -> Result<()> {
        let rendered = self.render(registry)?;
        write_atomic(output, &rendered)?;

        info!(
            path = %output.display(),
            target = %self.target,
            bytes = rendered.len(),
            "wrote registry"
        );
        Ok(())
    }

    /// Fail with [`CompilerError::Stale`] unless `output` already holds the rendering
    pub fn check(&self, registry: &Registry, output: &Path) -> Result<()> {
        let rendered = self.render(registry)?;

        match fs::read_to_string(output) {
            Ok(existing) if existing == rendered => Ok(()),
            Ok(_) => Err(CompilerError::Stale(output.display().to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(CompilerError::Stale(output.display().to_string()))
            }
            Err(e) => Err(CompilerError::Io(e)),
        }
    }

    /// Create template context from the registry
    fn create_context(&self, registry: &Registry) -> tera::Context {
        let services: Vec<ServiceContext<'_>> = registry
            .services
            .iter()
            .map(|service| {
                let mut operations: Vec<OperationContext<'_>> = service
                    .operations
                    .iter()
                    .map(|(name, entry)| OperationContext {
                        name,
                        method: entry.http_method.as_str(),
                        operation_id: &entry.operation_id,
                        path: entry.relative_path.as_deref(),
                    })
                    .collect();
                operations.sort_by(|a, b| a.name.cmp(b.name));

                ServiceContext {
                    name: &service.name,
                    base_path: &service.base_path,
                    operations,
                }
            })
            .collect();

        let mut context = tera::Context::new();
        context.insert("services", &services);
        context.insert("operation_count", &registry.operation_count());
        context
    }
}

/// Replace `path` with `content` atomically
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| {
        CompilerError::Generation(format!(
            "Failed to create output directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(content.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| {
        CompilerError::Generation(format!("Failed to write {}: {}", path.display(), e.error))
    })?;

    Ok(())
}

/// Render `registry` for `target` and write it to `output` (convenience function)
pub fn generate_registry(registry: &Registry, target: Target, output: &Path) -> Result<()> {
    RegistryEmitter::new(target)?.write(registry, output)
}
