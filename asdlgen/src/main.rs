use anyhow::Context;
use asdlgen::codegen::{GenConfig, Generator};
use asdlgen::schema::{SchemaIr, parse_schema};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "asdlgen")]
#[command(about = "Generate C++ classes from an ASDL schema")]
struct Cli {
    /// Path to the ASDL schema
    schema: PathBuf,

    /// Output file for the generated code (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file with generation options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Drop the `_e` / `_i` suffix from enumeration names
    #[arg(long)]
    no_enum_suffix: bool,

    /// Skip tree-serialization methods
    #[arg(long)]
    no_debug_methods: bool,

    /// Render the named simple sum as integer constants (repeatable)
    #[arg(long = "flat-int", value_name = "NAME")]
    flat_int: Vec<String>,

    /// Write the tag-to-class tables as JSON to this file
    #[arg(long, value_name = "FILE")]
    debug_info: Option<PathBuf>,

    /// Write the `#define` table of simple-sum tags to this file
    #[arg(long, value_name = "FILE")]
    enum_table: Option<PathBuf>,
}

impl Cli {
    /// Loads the config file, if any, and applies command-line overrides.
    fn gen_config(&self) -> anyhow::Result<GenConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                GenConfig::from_json(&json)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => GenConfig::new(),
        };

        if self.no_enum_suffix {
            config = config.strong_enum_suffix(false);
        }
        if self.no_debug_methods {
            config = config.emit_debug_methods(false);
        }
        for name in &self.flat_int {
            config = config.flat_integer_sum(name.clone());
        }
        if self.debug_info.is_some() {
            config = config.debug_sidecar(true);
        }
        Ok(config)
    }
}

fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.gen_config()?;

    let source = std::fs::read_to_string(&cli.schema)
        .with_context(|| format!("reading schema {}", cli.schema.display()))?;
    let schema = parse_schema(&source)
        .with_context(|| format!("parsing {}", cli.schema.display()))?;
    let ir = SchemaIr::from_schema(&schema)
        .with_context(|| format!("resolving {}", cli.schema.display()))?;

    let generator = Generator::new(&ir, &config);
    let output = generator.generate()?;
    let code = asdlgen::with_include_guard(&ir.name, &output.code);

    match &cli.output {
        Some(path) => write_file(path, &code)?,
        None => print!("{code}"),
    }

    if let (Some(path), Some(info)) = (&cli.debug_info, &output.debug_info) {
        write_file(path, &info.to_json()?)?;
    }
    if let Some(path) = &cli.enum_table {
        write_file(path, &generator.generate_enum_table()?)?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    run(&cli)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = "
        -- demo module
        module demo {
          lex_mode = Outer | DQ
          Shape = Circle(float r) | Square(float s)
        }
    ";

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("asdlgen").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config_path = dir.path().join("gen.json");
        std::fs::write(
            &config_path,
            r#"{"flat_integer_sums": ["lex_mode"], "emit_debug_methods": true}"#,
        )
        .expect("Failed to write config");

        let cli = cli(&[
            "schema.asdl",
            "--config",
            config_path.to_str().expect("utf-8 path"),
            "--no-debug-methods",
            "--flat-int",
            "other",
        ]);
        let config = cli.gen_config().expect("Failed to build config");

        assert!(!config.emit_debug_methods);
        assert!(config.strong_enum_suffix);
        assert!(config.is_flat("lex_mode"));
        assert!(config.is_flat("other"));
        assert!(!config.debug_sidecar);
    }

    #[test]
    fn test_run_writes_all_outputs() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let schema_path = dir.path().join("demo.asdl");
        std::fs::write(&schema_path, SCHEMA).expect("Failed to write schema");
        let out = dir.path().join("demo.asdl.h");
        let debug = dir.path().join("debug.json");
        let table = dir.path().join("enums.h");

        let cli = cli(&[
            schema_path.to_str().expect("utf-8 path"),
            "-o",
            out.to_str().expect("utf-8 path"),
            "--flat-int",
            "lex_mode",
            "--debug-info",
            debug.to_str().expect("utf-8 path"),
            "--enum-table",
            table.to_str().expect("utf-8 path"),
        ]);
        run(&cli).expect("run should succeed");

        let code = std::fs::read_to_string(&out).expect("Failed to read output");
        assert!(code.contains("#ifndef ASDL_DEMO_H"));
        assert!(code.contains("namespace lex_mode_i {"));
        assert!(code.contains("class Shape__Circle : public Shape_t {"));

        let json = std::fs::read_to_string(&debug).expect("Failed to read sidecar");
        assert!(json.contains("\"Shape__Square\""));

        let defines = std::fs::read_to_string(&table).expect("Failed to read table");
        assert_eq!(defines, "#define lex_mode__Outer 1\n#define lex_mode__DQ 2\n\n");
    }

    #[test]
    fn test_run_reports_schema_errors() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let schema_path = dir.path().join("bad.asdl");
        std::fs::write(&schema_path, "module bad { P = (Nope n) }").expect("Failed to write");

        let cli = cli(&[schema_path.to_str().expect("utf-8 path")]);
        let err = run(&cli).unwrap_err();
        assert!(format!("{err:#}").contains("unknown type 'Nope'"));
    }
}
