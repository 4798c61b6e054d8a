use clap::{Parser, Subcommand};
use colored::Colorize;
use rexc_core::{
    compile_artifact, emit, explain, parse, CompileError, Compiler, Dialect, Diagnostic,
};

#[derive(Parser)]
#[command(name = "rexc")]
#[command(about = "Rexc - compile a readable pattern DSL to native regex syntax")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a pattern to a target dialect
    Compile {
        /// The pattern source (directives and pattern body)
        pattern: String,
        /// Target dialect: pcre2 or ecma (overrides a %engine directive)
        #[arg(short, long)]
        target: Option<String>,
        /// Show the AST and IR alongside the output
        #[arg(short, long)]
        debug: bool,
    },
    /// Check a pattern and report diagnostics without emitting
    Check {
        /// The pattern source
        pattern: String,
    },
    /// Print the compiled IR artifact as JSON
    Ir {
        /// The pattern source
        pattern: String,
        /// Pretty-print the JSON
        #[arg(short, long)]
        pretty: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            pattern,
            target,
            debug,
        } => cmd_compile(&pattern, target.as_deref(), debug),
        Commands::Check { pattern } => cmd_check(&pattern),
        Commands::Ir { pattern, pretty } => cmd_ir(&pattern, pretty),
    }
}

/// Pick the dialect from --target, falling back to the %engine directive
fn resolve_dialect(flag: Option<&str>, engine_hint: Option<&str>) -> Result<Dialect, String> {
    if let Some(name) = flag {
        return name.parse();
    }
    if let Some(hint) = engine_hint
        && let Ok(dialect) = hint.parse()
    {
        return Ok(dialect);
    }
    Ok(Dialect::Pcre2)
}

fn cmd_compile(pattern: &str, target: Option<&str>, debug: bool) {
    let (directives, ast) = match parse(pattern) {
        Ok(parsed) => parsed,
        Err(e) => fail(pattern, &e.into()),
    };

    let dialect = match resolve_dialect(target, directives.engine.as_deref()) {
        Ok(dialect) => dialect,
        Err(message) => {
            eprintln!("{} {}", "error:".red().bold(), message);
            std::process::exit(1);
        }
    };

    let artifact = match Compiler::new().compile(&directives.flags, &ast) {
        Ok(artifact) => artifact,
        Err(e) => fail(pattern, &e.into()),
    };

    let output = match emit(&artifact, dialect) {
        Ok(output) => output,
        Err(e) => fail(pattern, &e.into()),
    };

    if debug {
        println!("{}", "Target:".bold());
        println!("  {}", dialect.to_string().cyan());
        println!("{}", "AST:".bold());
        println!("  {:?}", ast);
        println!("{}", "IR:".bold());
        println!("  {:?}", artifact.ir);
        println!("{}", "Output:".bold());
        println!("  {}", output.green());
    } else {
        println!("{}", output);
    }
}

fn cmd_check(pattern: &str) {
    match compile_artifact(pattern) {
        Ok(artifact) => {
            println!("{}", "✓ Pattern is valid".green().bold());
            if !artifact.flags.is_empty() {
                println!("  Flags: {}", artifact.flags.letters().cyan());
            }
            if !artifact.features.named_groups.is_empty() {
                let names: Vec<_> = artifact
                    .features
                    .named_groups
                    .iter()
                    .cloned()
                    .collect();
                println!("  Named groups: {}", names.join(", ").cyan());
            }
            println!("  Capture groups: {}", artifact.features.capture_count);
        }
        Err(e) => fail(pattern, &e),
    }
}

fn cmd_ir(pattern: &str, pretty: bool) {
    let artifact = match compile_artifact(pattern) {
        Ok(artifact) => artifact,
        Err(e) => fail(pattern, &e),
    };

    let json = if pretty {
        serde_json::to_string_pretty(&artifact)
    } else {
        serde_json::to_string(&artifact)
    };
    match json {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Report a diagnostic with its hint and exit
fn fail(source: &str, error: &CompileError) -> ! {
    let Diagnostic {
        message,
        hint,
        span,
    } = explain(error);

    eprintln!("{} {}", "error:".red().bold(), message);
    if let Some(span) = span
        && let Some(line) = source.lines().nth(span.line as usize - 1)
    {
        eprintln!("  {}", line);
        let indent = " ".repeat(span.column as usize - 1);
        let width = span.len().max(1).min(line.len() + 1 - indent.len());
        eprintln!("  {}{}", indent, "^".repeat(width).red());
    }
    eprintln!("{} {}", "hint:".yellow().bold(), hint);
    std::process::exit(1);
}
