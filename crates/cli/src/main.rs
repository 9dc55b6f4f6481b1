//! opreg CLI
//!
//! Command-line interface for compiling an API description into the
//! operation registry consumed by hand-written service classes.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::*;
use opreg_analyzer::{SourceScanner, DEFAULT_USAGE_PATTERN};
use opreg_common::{OperationDescriptor, Registry, UsageSource};
use opreg_generator::{RegistryEmitter, Target};
use opreg_registry::{Catalog, OperationResolver, RegistryCompiler};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "opreg")]
#[command(version, about = "Compile an API description into a per-service operation registry", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Load an API description and show how each operation resolves
    #[command(after_help = "EXAMPLES:\n  \
        # List operations and their service/method\n  \
        opreg parse --spec openapi/v2.yaml --verbose")]
    Parse {
        /// Path to the API description (JSON or YAML)
        #[arg(short, long)]
        spec: PathBuf,
    },

    /// Compile the registry and write the generated source file
    #[command(after_help = "EXAMPLES:\n  \
        # Generate the TypeScript registry\n  \
        opreg generate \\\n    \
        --spec openapi/v2.yaml \\\n    \
        --output src/generated/operations.ts \\\n    \
        --consumers src/services\n\n  \
        # Generate a Rust registry without a consumer check\n  \
        opreg generate \\\n    \
        --spec openapi/v2.json \\\n    \
        --output src/operations.rs \\\n    \
        --target rust \\\n    \
        --skip-usage-check")]
    Generate(PipelineArgs),

    /// Compile the registry and verify the committed file is up to date
    #[command(after_help = "EXAMPLES:\n  \
        # Fail in CI when the registry needs regenerating\n  \
        opreg check --spec openapi/v2.yaml --output src/generated/operations.ts")]
    Check(PipelineArgs),

    /// Print the built-in service catalog
    Catalog,
}

#[derive(Args)]
struct PipelineArgs {
    /// Path to the API description (JSON or YAML)
    #[arg(short, long)]
    spec: PathBuf,

    /// Generated registry file
    #[arg(short, long, default_value = "src/generated/operations.ts")]
    output: PathBuf,

    /// Output language
    #[arg(short, long, value_enum, default_value_t = TargetArg::Typescript)]
    target: TargetArg,

    /// Directory holding the hand-written service classes
    #[arg(short, long, default_value = "src/services")]
    consumers: PathBuf,

    /// Regex with one capture group that extracts referenced method names
    #[arg(long, default_value = DEFAULT_USAGE_PATTERN)]
    usage_pattern: String,

    /// Do not cross-check the registry against the consumer classes
    #[arg(long)]
    skip_usage_check: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TargetArg {
    /// TypeScript module
    #[value(alias = "ts")]
    Typescript,
    /// Rust module
    #[value(alias = "rs")]
    Rust,
}

impl From<TargetArg> for Target {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Typescript => Target::TypeScript,
            TargetArg::Rust => Target::Rust,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Parse { spec } => parse_command(&spec, cli.verbose)?,
        Commands::Generate(args) => pipeline_command(&args, false, cli.verbose)?,
        Commands::Check(args) => pipeline_command(&args, true, cli.verbose)?,
        Commands::Catalog => catalog_command(cli.verbose)?,
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise warnings, or debug output with `--verbose`
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_spec(spec_path: &Path) -> Result<Vec<OperationDescriptor>> {
    println!(
        "{} Loading API description: {}",
        "→".cyan(),
        spec_path.display()
    );
    let operations = opreg_parser::load_operations(spec_path)
        .with_context(|| format!("Failed to load API description {}", spec_path.display()))?;
    println!("{} Loaded {} operations", "✓".green(), operations.len());
    Ok(operations)
}

fn parse_command(spec_path: &Path, verbose: bool) -> Result<()> {
    let operations = load_spec(spec_path)?;
    let catalog = Catalog::builtin().context("Failed to load built-in catalog")?;
    let resolver = OperationResolver::new(&catalog.services);

    let mut unmapped = Vec::new();
    let mut failed = 0;
    for op in &operations {
        let Some(resolution) = resolver.resolve(&op.operation_id) else {
            unmapped.push(op);
            continue;
        };

        let method = catalog.aliases.method_name(
            &resolution.service.name,
            &op.operation_id,
            resolution.matched_prefix,
        );
        match method {
            Ok(method) if verbose => println!(
                "  {:<6} {:<45} {} {}.{}",
                op.http_method.to_string(),
                op.absolute_path,
                "→".cyan(),
                resolution.service.name.yellow(),
                method
            ),
            Ok(_) => {}
            Err(e) => {
                failed += 1;
                println!("  {} {}", "✗".red(), e);
            }
        }
    }

    for op in &unmapped {
        println!(
            "  {:<6} {:<45} {} {} ({})",
            op.http_method.to_string(),
            op.absolute_path,
            "→".cyan(),
            "UNMAPPED".red().bold(),
            op.operation_id
        );
    }

    println!("\n{}", "Summary:".bold());
    println!("  Operations: {}", operations.len());
    println!(
        "  Resolved: {}",
        (operations.len() - unmapped.len() - failed)
            .to_string()
            .green()
    );
    if failed > 0 {
        println!("  Naming errors: {}", failed.to_string().red());
    }
    if !unmapped.is_empty() {
        println!("  Unmapped: {}", unmapped.len().to_string().red());
    }

    Ok(())
}

fn pipeline_command(args: &PipelineArgs, check_only: bool, verbose: bool) -> Result<()> {
    let target: Target = args.target.into();

    if verbose {
        println!("  Spec: {}", args.spec.display());
        println!("  Output: {}", args.output.display());
        println!("  Target: {}", target);
        println!("  Consumers: {}", args.consumers.display());
    }

    let operations = load_spec(&args.spec)?;
    let compiler = RegistryCompiler::builtin().context("Failed to load built-in catalog")?;

    let scanner = if args.skip_usage_check {
        println!(
            "{} Skipping consumer usage check (--skip-usage-check)",
            "⚠".yellow()
        );
        None
    } else {
        let scanner = SourceScanner::with_pattern(args.consumers.clone(), &args.usage_pattern)
            .context("Invalid --usage-pattern")?;
        report_unclaimed(&scanner, compiler.catalog(), verbose);
        Some(scanner)
    };

    println!("{} Compiling registry...", "→".cyan());
    let usage = scanner.as_ref().map(|s| s as &dyn UsageSource);
    let registry = compiler
        .compile(&operations, usage)
        .context("Registry compilation failed")?;
    print_registry_summary(&registry, verbose);

    let emitter = RegistryEmitter::new(target).context("Failed to create emitter")?;
    if check_only {
        emitter
            .check(&registry, &args.output)
            .context("Registry check failed")?;
        println!(
            "\n{} {} is up to date",
            "✓".green().bold(),
            args.output.display()
        );
    } else {
        println!("{} Writing {} registry...", "→".cyan(), target);
        emitter
            .write(&registry, &args.output)
            .context("Failed to write registry")?;
        println!("\n{}", "✓ Generation complete!".green().bold());
        println!("  📄 {}", args.output.display());
    }

    Ok(())
}

/// Consumer files no service claims are worth a look but never fatal
fn report_unclaimed(scanner: &SourceScanner, catalog: &Catalog, verbose: bool) {
    if !scanner.root().is_dir() {
        return;
    }

    match scanner.unclaimed_sources(&catalog.services) {
        Ok(files) if verbose => {
            for file in files {
                println!(
                    "  {} No service declares consumer {}",
                    "⚠".yellow(),
                    file.display()
                );
            }
        }
        Ok(files) if !files.is_empty() => tracing::info!(
            count = files.len(),
            "consumer sources not claimed by any service"
        ),
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "failed to scan consumer directory"),
    }
}

fn print_registry_summary(registry: &Registry, verbose: bool) {
    println!(
        "{} Registered {} operations across {} services",
        "✓".green(),
        registry.operation_count(),
        registry.services.len()
    );

    if verbose {
        println!("\n{}", "Services:".bold());
        for service in &registry.services {
            println!(
                "  • {} {} ({} methods)",
                service.name.cyan(),
                service.base_path,
                service.operations.len()
            );
        }
    }
}

fn catalog_command(verbose: bool) -> Result<()> {
    let catalog = Catalog::builtin().context("Failed to load built-in catalog")?;

    println!("{}", "Service Catalog:".bold());
    for (i, service) in catalog.services.iter().enumerate() {
        println!(
            "  {:>2}. {} {}",
            i + 1,
            service.name.yellow(),
            service.base_path
        );
        println!("      Prefixes: {}", service.prefixes.join(", "));
        if !service.explicit_operation_ids.is_empty() {
            println!(
                "      Operation ids: {}",
                service.explicit_operation_ids.join(", ")
            );
        }
        if let Some(ref consumer) = service.consumer {
            println!("      Consumer: {}", consumer);
        }
    }

    println!("\n  Aliases: {}", catalog.aliases.len());
    println!("  Path overrides: {}", catalog.path_overrides.len());

    if verbose {
        println!("\n{}", "Path overrides:".bold());
        for id in catalog.path_overrides.operation_ids() {
            println!(
                "  • {} {} {}",
                id.cyan(),
                "→".cyan(),
                catalog.path_overrides.get(id).unwrap_or_default()
            );
        }
    }

    Ok(())
}
