use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "x")]
#[command(about = "Development automation for eight-rs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Display submodules with their own unit tests
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Module {
    Surface,
    Grid,
    Blink,
    Present,
    Text,
    Font,
    Config,
}

impl Module {
    fn filter(self) -> &'static str {
        match self {
            Module::Surface => "display::surface",
            Module::Grid => "display::grid",
            Module::Blink => "display::blink",
            Module::Present => "display::present",
            Module::Text => "display::text",
            Module::Font => "display::font",
            Module::Config => "display::config",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run all CI checks (fmt, clippy, build, test)
    Ci {
        #[arg(long)]
        verbose: bool,
    },
    /// Format and lint only
    Check {
        #[arg(long)]
        verbose: bool,
    },
    /// Format code
    Fmt {
        #[arg(long)]
        check: bool,
    },
    /// Run clippy
    Clippy {
        #[arg(long)]
        fix: bool,
    },
    /// Build the project
    Build {
        #[arg(long)]
        release: bool,
    },
    /// Run tests
    Test {
        #[arg(long)]
        doc: bool,
        #[arg(long)]
        ignored: bool,
        /// Run only the integration tests under tests/
        #[arg(long, conflicts_with = "module")]
        integration: bool,
        /// Run only the unit tests of these display modules
        #[arg(long, value_enum)]
        module: Vec<Module>,
    },
    /// Run benchmarks
    Bench {
        /// Benchmark target (blink_bench, present_bench)
        name: Option<String>,
    },
    /// Open the console window
    Run {
        /// Config file passed to the console
        #[arg(short, long)]
        config: Option<String>,
        #[arg(long)]
        release: bool,
        /// Log filter, e.g. "debug" or "eight_rs=trace"
        #[arg(long)]
        log: Option<String>,
    },
    /// Pre-commit hook (fmt, clippy, test)
    PreCommit,
    /// Install git hooks
    InstallHooks,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci { verbose } => run_ci(verbose),
        Commands::Check { verbose } => run_check(verbose),
        Commands::Fmt { check } => run_fmt(check),
        Commands::Clippy { fix } => run_clippy(fix),
        Commands::Build { release } => run_build(release),
        Commands::Test {
            doc,
            ignored,
            integration,
            module,
        } => run_test(doc, ignored, integration, &module),
        Commands::Bench { name } => run_bench(name.as_deref()),
        Commands::Run {
            config,
            release,
            log,
        } => run_console(config.as_deref(), release, log.as_deref()),
        Commands::PreCommit => run_pre_commit(),
        Commands::InstallHooks => install_hooks(),
    }
}

fn run_ci(verbose: bool) -> Result<()> {
    println!("{}", "=== Running CI Pipeline ===".bold().blue());

    let start = Instant::now();

    run_task("Format Check", || run_fmt(true), verbose)?;
    run_task("Clippy", || run_clippy(false), verbose)?;
    run_task("Build", || run_build(false), verbose)?;
    run_task("Test", || run_test(false, false, false, &[]), verbose)?;

    println!(
        "\n{} {}",
        "✓ CI passed in".green().bold(),
        format!("{:.2}s", start.elapsed().as_secs_f64()).bold()
    );

    Ok(())
}

fn run_check(verbose: bool) -> Result<()> {
    println!("{}", "=== Running Quick Checks ===".bold().blue());

    let start = Instant::now();

    run_task("Format Check", || run_fmt(true), verbose)?;
    run_task("Clippy", || run_clippy(false), verbose)?;

    println!(
        "\n{} {}",
        "✓ Checks passed in".green().bold(),
        format!("{:.2}s", start.elapsed().as_secs_f64()).bold()
    );

    Ok(())
}

fn run_fmt(check: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("fmt").arg("--all");

    if check {
        cmd.arg("--").arg("--check");
    }

    execute_command(&mut cmd)
}

fn run_clippy(fix: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("clippy").arg("--workspace").arg("--all-targets");

    if fix {
        cmd.arg("--fix");
    } else {
        cmd.arg("--").arg("-D").arg("warnings");
    }

    execute_command(&mut cmd)
}

fn run_build(release: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("build");

    if release {
        cmd.arg("--release");
    }

    execute_command(&mut cmd)
}

fn test_command(ignored: bool, configure: impl FnOnce(&mut Command)) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.arg("test");
    configure(&mut cmd);

    if ignored {
        cmd.arg("--").arg("--ignored");
    }
    cmd
}

fn run_test(doc: bool, ignored: bool, integration: bool, modules: &[Module]) -> Result<()> {
    if doc {
        return execute_command(&mut test_command(ignored, |cmd| {
            cmd.arg("--doc");
        }));
    }

    if integration {
        return execute_command(&mut test_command(ignored, |cmd| {
            cmd.arg("--test").arg("*");
        }));
    }

    if modules.is_empty() {
        return execute_command(&mut test_command(ignored, |_| {}));
    }

    // Run each module's unit tests in turn
    let mut failed = Vec::new();
    for &module in modules {
        println!("{} Running {} tests...", "→".blue(), module.filter().bold());

        let mut cmd = test_command(ignored, |cmd| {
            cmd.arg("--lib").arg(module.filter());
        });

        match execute_command(&mut cmd) {
            Ok(()) => println!("{} {} tests passed\n", "✓".green(), module.filter()),
            Err(e) => {
                println!("{} {} tests failed\n", "✗".red(), module.filter());
                if modules.len() == 1 {
                    return Err(e);
                }
                failed.push(module.filter());
            }
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("Module tests failed: {}", failed.join(", "))
    }
}

fn run_bench(name: Option<&str>) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("bench");

    if let Some(name) = name {
        cmd.arg("--bench").arg(name);
    }

    execute_command(&mut cmd)
}

fn run_console(config: Option<&str>, release: bool, log: Option<&str>) -> Result<()> {
    println!("{}", "=== Eight Console ===".bold().blue());

    if let Some(config) = config {
        if !Path::new(config).exists() {
            println!(
                "{} Config file not found: {} (defaults will be used)",
                "⚠".yellow().bold(),
                config.yellow()
            );
        } else {
            println!("{} Config: {}", "✓".green(), config.cyan());
        }
    }

    println!(
        "{} Build mode: {}",
        "→".blue(),
        if release {
            "release".green().bold()
        } else {
            "debug".yellow().bold()
        }
    );
    println!();

    let mut cmd = Command::new("cargo");
    cmd.arg("run").arg("--bin").arg("eight-rs");

    if release {
        cmd.arg("--release");
    }
    if let Some(config) = config {
        cmd.arg("--").arg(config);
    }
    if let Some(log) = log {
        cmd.env("RUST_LOG", log);
    }

    let start = Instant::now();
    execute_command(&mut cmd)?;

    println!(
        "\n{} Console closed after {}",
        "✓".green().bold(),
        format!("{:.2}s", start.elapsed().as_secs_f64()).bold()
    );

    Ok(())
}

fn run_pre_commit() -> Result<()> {
    println!("{}", "=== Pre-commit Checks ===".bold().blue());

    let start = Instant::now();

    run_task("Format Check", || run_fmt(true), false)?;
    run_task("Clippy", || run_clippy(false), false)?;
    run_task("Test", || run_test(false, false, false, &[]), false)?;

    println!(
        "\n{} {}",
        "✓ Pre-commit checks passed in".green().bold(),
        format!("{:.2}s", start.elapsed().as_secs_f64()).bold()
    );

    Ok(())
}

fn install_hooks() -> Result<()> {
    use std::fs;

    println!("{}", "Installing git hooks...".bold());

    let hook_content = r#"#!/bin/sh
# Auto-generated by cargo x install-hooks
set -e

cargo x pre-commit
"#;

    let hook_path = Path::new(".git/hooks/pre-commit");
    if !hook_path.parent().is_some_and(Path::exists) {
        anyhow::bail!("No .git/hooks directory; run from the repository root");
    }
    fs::write(hook_path, hook_content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mut perms = fs::metadata(hook_path)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(hook_path, perms)?;
    }

    println!("{}", "✓ Git hooks installed".green());

    Ok(())
}

fn run_task<F>(name: &str, task: F, verbose: bool) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    print!("{} {} ... ", "→".blue(), name);

    let start = Instant::now();

    match task() {
        Ok(()) => {
            if verbose {
                println!(
                    "{} ({:.2}s)",
                    "✓".green().bold(),
                    start.elapsed().as_secs_f64()
                );
            } else {
                println!("{}", "✓".green().bold());
            }
            Ok(())
        }
        Err(e) => {
            println!("{}", "✗".red().bold());
            Err(e)
        }
    }
}

fn execute_command(cmd: &mut Command) -> Result<()> {
    let status = cmd
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;

    if !status.success() {
        anyhow::bail!("Command failed with exit code: {}", status);
    }

    Ok(())
}
