//! provo CLI: record and query PROV-O provenance.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};

use provo::batch::Batch;
use provo::builder::{Backend, BackendKind, NonValidatingBuilder};
use provo::config::ProvConfig;
use provo::error::ProvError;
use provo::getter::{ProvenanceGetter, QueryGetter};
use provo::graph::GraphFormat;
use provo::graph::sparql::SparqlStore;
use provo::temporal::{self, ABSENT_TIMESTAMP};
use provo::vocab::{Relation, TimeBound};

#[derive(Parser)]
#[command(name = "provo", version, about = "Type-checked PROV-O provenance")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Namespace for generated URIs (overrides the config file).
    #[arg(long, global = true)]
    namespace: Option<String>,

    /// Persistent oxigraph store directory (overrides the config file).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a batch file through a builder.
    ///
    /// The immediate backend writes the resulting graph. The deferred backend
    /// flushes its update log into the store at --data-dir, or prints it.
    Apply {
        /// Path to a TOML batch file.
        file: PathBuf,

        /// immediate | deferred
        #[arg(long)]
        backend: Option<BackendKind>,

        /// turtle | ntriples | rdfxml
        #[arg(long)]
        format: Option<GraphFormat>,

        /// Write the graph here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print the update log a batch file produces.
    Updates {
        /// Path to a TOML batch file.
        file: PathBuf,
    },

    /// Look up a relationship or timestamp in the --data-dir store.
    Query {
        /// Subject URI.
        subject: String,

        /// Relation name, e.g. wasGeneratedBy.
        #[arg(long, conflicts_with = "time")]
        relation: Option<Relation>,

        /// Activity bound to read instead of a relation.
        #[arg(long)]
        time: Option<Bound>,
    },

    /// Export every statement in the --data-dir store as JSON.
    Export,

    /// List relations and their type signatures.
    Vocab,
}

#[derive(Clone, Copy, ValueEnum)]
enum Bound {
    Started,
    Ended,
}

impl From<Bound> for TimeBound {
    fn from(b: Bound) -> Self {
        match b {
            Bound::Started => TimeBound::Started,
            Bound::Ended => TimeBound::Ended,
        }
    }
}

fn open_store(config: &ProvConfig) -> Result<SparqlStore> {
    let dir = config.data_dir.as_ref().ok_or_else(|| ProvError::Config {
        path: "--data-dir".into(),
        message: "this command needs a persistent store directory".into(),
    })?;
    Ok(SparqlStore::open(dir)?)
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ProvConfig::load(path)?,
        None => ProvConfig::default(),
    };
    if let Some(ns) = cli.namespace {
        config.namespace = ns;
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .init();

    match cli.command {
        Commands::Apply {
            file,
            backend,
            format,
            output,
        } => {
            if let Some(kind) = backend {
                config.backend = kind;
            }
            if let Some(format) = format {
                config.format = format;
            }
            let batch = Batch::load(&file)?;
            let mut builder = Backend::from_config(&config)?;
            let report = batch.apply(&mut builder)?;
            eprintln!(
                "{} created, {} accepted, {} rejected",
                report.created.len(),
                report.accepted,
                report.rejected
            );

            match builder {
                Backend::Immediate(graph) => match output {
                    Some(path) => {
                        let file = std::fs::File::create(&path).into_diagnostic()?;
                        graph.write_to(std::io::BufWriter::new(file), config.format)?;
                        eprintln!("wrote {} to {}", config.format, path.display());
                    }
                    None => graph.write_to(std::io::stdout().lock(), config.format)?,
                },
                Backend::Deferred(log) => {
                    if config.data_dir.is_some() {
                        let store = open_store(&config)?;
                        log.flush_to(&store)?;
                        eprintln!(
                            "applied {} updates; store holds {} statements",
                            log.log().len(),
                            store.len()?
                        );
                    } else {
                        for update in log.log().iter() {
                            println!("{update}");
                        }
                    }
                }
            }
        }

        Commands::Updates { file } => {
            let batch = Batch::load(&file)?;
            let mut builder = Backend::new(BackendKind::Deferred, &config.namespace)?;
            batch.apply(&mut builder)?;
            if let Backend::Deferred(log) = builder {
                for update in log.pending_updates() {
                    println!("{update}");
                }
            }
        }

        Commands::Query {
            subject,
            relation,
            time,
        } => {
            let store = open_store(&config)?;
            let getter = QueryGetter::new(&store);
            match (relation, time) {
                (Some(relation), _) => {
                    for value in getter.related(relation, &subject)? {
                        println!("{value}");
                    }
                }
                (None, Some(bound)) => {
                    let millis = getter.timestamp(bound.into(), &subject)?;
                    if millis == ABSENT_TIMESTAMP {
                        println!("(none)");
                    } else {
                        println!("{millis}\t{}", temporal::to_xsd_date_time(millis)?);
                    }
                }
                (None, None) => {
                    return Err(ProvError::Config {
                        path: "query".into(),
                        message: "pass --relation or --time".into(),
                    }
                    .into());
                }
            }
        }

        Commands::Export => {
            let store = open_store(&config)?;
            let statements = store.statements()?;
            println!(
                "{}",
                serde_json::to_string_pretty(&statements).into_diagnostic()?
            );
        }

        Commands::Vocab => {
            for relation in Relation::ALL {
                let sig = relation.signature();
                println!(
                    "{:<20} {:<9} -> {}",
                    relation.local_name(),
                    sig.subject.to_string(),
                    sig.object.to_string()
                );
            }
        }
    }

    Ok(())
}
