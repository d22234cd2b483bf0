//! prograph CLI - построение графов программ из синтаксических деревьев.
//!
//! Использование:
//!   prograph <tree.json>             - вывести граф класса в DOT
//!   prograph --records <tree.json>   - обучающие записи, по одной на строку
//!   prograph --pairs <tree.json>     - пары с мутантами
//!   prograph --help                  - справка

use std::env;
use std::io::{self, BufWriter, Write};
use std::process;

use log::{info, warn};

use prograph::dataset::{record_pairs, write_vocabulary, DatasetWriter};
use prograph::walker::{walk, DotVisitor, RecordVisitor};
use prograph::{GeneratorConfig, GraphResult, SyntaxTree, TreeDriver};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP: &str = r#"
prograph - program graphs for ML on source code

USAGE:
    prograph [MODE] [--config FILE] <tree.json>
    prograph --help, -h       Show this help
    prograph --version, -v    Show version

MODES:
    --dot         Graphviz DOT of the class graph (default)
    --records     One training record per method, JSON lines
    --pairs       Correct records with sampled off-by-one mutants, JSON lines
    --vocab       Token, symbol, sub-word and node label vocabulary

CONFIG (JSON, all fields optional):
    {"buggy_per_hundred": 10, "balanced": false, "seed": 42, "skip_empty_records": true}

Logging is controlled by RUST_LOG, e.g. RUST_LOG=prograph=debug.
"#;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Dot,
    Records,
    Pairs,
    Vocab,
}

struct Args {
    mode: Mode,
    config: Option<String>,
    input: String,
}

fn main() {
    env_logger::init();

    let args = match parse_args(env::args().skip(1).collect()) {
        Some(args) => args,
        None => return,
    };

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Разобрать аргументы. `None`, если запрошена справка или версия.
fn parse_args(raw: Vec<String>) -> Option<Args> {
    let mut mode = Mode::Dot;
    let mut config = None;
    let mut input = None;

    let mut iter = raw.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                println!("{}", HELP);
                return None;
            }
            "--version" | "-v" => {
                println!("prograph {}", VERSION);
                return None;
            }
            "--dot" => mode = Mode::Dot,
            "--records" => mode = Mode::Records,
            "--pairs" => mode = Mode::Pairs,
            "--vocab" => mode = Mode::Vocab,
            "--config" | "-c" => match iter.next() {
                Some(path) => config = Some(path),
                None => usage_error("--config requires a file argument"),
            },
            other if other.starts_with('-') => usage_error(&format!("Unknown option: {}", other)),
            file => {
                if input.replace(file.to_string()).is_some() {
                    usage_error("Too many arguments.");
                }
            }
        }
    }

    match input {
        Some(input) => Some(Args {
            mode,
            config,
            input,
        }),
        None => usage_error("Missing input file."),
    }
}

fn usage_error(message: &str) -> ! {
    eprintln!("{}", message);
    eprintln!("Use --help for usage information.");
    process::exit(1);
}

fn run(args: &Args) -> GraphResult<()> {
    let config = match &args.config {
        Some(path) => GeneratorConfig::from_path(path)?,
        None => GeneratorConfig::default(),
    };

    let tree = SyntaxTree::from_path(&args.input)?;
    let graph = match TreeDriver::drive(&tree)? {
        Some(graph) => graph,
        None => {
            warn!("{}: no type declaration found", args.input);
            return Ok(());
        }
    };
    info!(
        "{}: class {} with {} method(s)",
        args.input,
        graph.name(),
        graph.methods().len()
    );

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match args.mode {
        Mode::Dot => {
            let mut dot = DotVisitor::new();
            walk(&graph, &mut dot);
            out.write_all(dot.as_str().as_bytes())?;
            out.flush()?;
        }
        Mode::Records => {
            let mut visitor = RecordVisitor::new();
            walk(&graph, &mut visitor);
            let mut writer = DatasetWriter::new(out, config.sampler());
            for record in visitor.records() {
                writer.write_record(record)?;
            }
            writer.flush()?;
        }
        Mode::Pairs => {
            let mut rng = config.rng();
            let pairs = record_pairs(&graph, &config.mutator(), &mut rng);
            let mut writer = DatasetWriter::new(out, config.sampler());
            for pair in &pairs {
                writer.write_pair(pair, &mut rng)?;
            }
            writer.flush()?;
            info!("{} line(s) from {} pair(s)", writer.written(), pairs.len());
        }
        Mode::Vocab => write_vocabulary(&graph, out)?,
    }
    Ok(())
}
