use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use tracklore::pipeline;
use tracklore::{BlendInputWriter, DistillerConfig, ProfileStore};
use tracklore_core::repetition::DEFAULT_REP_THRESHOLD;
use tracklore_matcher::describe;
use tracklore_storage::enrich_catalog;

/// Distills track prototypes and genre profiles, and ranks tracks against blended profiles
#[derive(Parser, Debug)]
#[command(name = "tracklore")]
#[command(about = "Track prototypes, genre profiles and profile-based recommendation", long_about = None)]
struct Args {
    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// JSON configuration with optional `prototype`, `distiller` and `matcher` sections
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add repetition tags to a catalog file
    Enrich {
        #[arg(long)]
        input: PathBuf,
        /// Defaults to rewriting the input
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long, default_value_t = DEFAULT_REP_THRESHOLD)]
        rep_threshold: f64,
    },

    /// Build one prototype artifact per track
    Prototypes {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Tab-separated `token<TAB>pos<TAB>lemma` lexicon
        #[arg(long)]
        lexicon: Option<PathBuf>,
        /// Extra stopwords, one per line
        #[arg(long)]
        stopwords: Option<PathBuf>,
    },

    /// Distill typical and rigid properties per genre
    Profiles {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Permissive thresholds
        #[arg(long)]
        light: bool,
        /// JSON genre lexicon replacing the built-in one
        #[arg(long)]
        genres: Option<PathBuf>,
        #[arg(long)]
        typical_thr_tags: Option<f64>,
        #[arg(long)]
        rigid_thr_tags: Option<f64>,
        #[arg(long)]
        typical_thr_words: Option<f64>,
        #[arg(long)]
        rigid_thr_words: Option<f64>,
        #[arg(long)]
        min_df_words: Option<usize>,
        #[arg(long)]
        topk_typical: Option<usize>,
        #[arg(long)]
        max_rigid: Option<usize>,
    },

    /// Write blend-engine input files from stored genre profiles
    BlendInput {
        #[arg(long)]
        profiles: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Every ordered pair of stored genres
        #[arg(long, conflicts_with_all = ["head", "modifier"])]
        all: bool,
        head: Option<String>,
        modifier: Option<String>,
    },

    /// Rank catalog tracks against a composite profile
    Recommend {
        /// Composite profile (blend-engine text form, or `.json`)
        profile: PathBuf,
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        prototypes: PathBuf,
        #[arg(long)]
        min_match_rate: Option<f64>,
        #[arg(long)]
        min_anchors: Option<usize>,
        #[arg(long)]
        max_results: Option<usize>,
        /// Directory receiving recommendations.tsv and resume.tsv
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("tracklore v{}", env!("CARGO_PKG_VERSION"));
    let mut config = pipeline::load_run_config(args.config.as_deref())?;

    match args.command {
        Command::Enrich {
            input,
            output,
            rep_threshold,
        } => {
            let processed = enrich_catalog(&input, output.as_deref(), rep_threshold)?;
            println!("Enriched {} records", processed);
        }

        Command::Prototypes {
            input,
            out,
            lexicon,
            stopwords,
        } => {
            if lexicon.is_some() {
                config.prototype.lexicon_path = lexicon;
            }
            let run = pipeline::build_prototypes(&input, &out, &config.prototype, stopwords.as_deref())?;
            println!(
                "Wrote {} prototypes for {} tracks to {}",
                run.written,
                run.tracks,
                out.display()
            );
        }

        Command::Profiles {
            input,
            out,
            light,
            genres,
            typical_thr_tags,
            rigid_thr_tags,
            typical_thr_words,
            rigid_thr_words,
            min_df_words,
            topk_typical,
            max_rigid,
        } => {
            let mut distiller = if light {
                DistillerConfig {
                    alpha: config.distiller.alpha,
                    common_penalty: config.distiller.common_penalty,
                    distinctive_max_genres: config.distiller.distinctive_max_genres,
                    distinctive_boost: config.distiller.distinctive_boost,
                    ..DistillerConfig::light()
                }
            } else {
                config.distiller.clone()
            };
            if let Some(v) = typical_thr_tags {
                distiller.typical_thr_tags = v;
            }
            if let Some(v) = rigid_thr_tags {
                distiller.rigid_thr_tags = v;
            }
            if let Some(v) = typical_thr_words {
                distiller.typical_thr_words = v;
            }
            if let Some(v) = rigid_thr_words {
                distiller.rigid_thr_words = v;
            }
            if let Some(v) = min_df_words {
                distiller.min_df_words = v;
            }
            if let Some(v) = topk_typical {
                distiller.topk_typical = v;
            }
            if let Some(v) = max_rigid {
                distiller.max_rigid = v;
            }

            let lexicon = pipeline::load_genre_lexicon(genres.as_deref())?;
            let profiles = pipeline::distill_profiles(&input, &out, &distiller, lexicon)?;
            for profile in &profiles {
                println!(
                    "{:<10} tracks={:<6} typical={:<3} rigid={}",
                    profile.category,
                    profile.track_count,
                    profile.typical.len(),
                    profile.rigid.len()
                );
            }
        }

        Command::BlendInput {
            profiles,
            out,
            all,
            head,
            modifier,
        } => {
            let writer = BlendInputWriter::new(ProfileStore::new(&profiles), &out);
            let written = match (all, head, modifier) {
                (true, _, _) => writer.write_all_pairs()?,
                (false, Some(head), Some(modifier)) => vec![writer.write_pair(&head, &modifier)?],
                _ => bail!("blend-input needs <HEAD> <MODIFIER> or --all"),
            };
            for path in written {
                println!("{}", path.display());
            }
        }

        Command::Recommend {
            profile,
            input,
            prototypes,
            min_match_rate,
            min_anchors,
            max_results,
            export_dir,
        } => {
            if let Some(v) = min_match_rate {
                config.matcher.min_match_rate = v;
            }
            if let Some(v) = min_anchors {
                config.matcher.min_anchors = v;
            }
            if max_results.is_some() {
                config.matcher.max_results = max_results;
            }

            let run = pipeline::recommend(
                &profile,
                &input,
                &prototypes,
                &config.matcher,
                export_dir.as_deref(),
            )
            .with_context(|| format!("Recommendation for {} failed", profile.display()))?;

            println!("Recommendation for category: {}", run.summary.category);
            println!("Active properties: {:?}", run.profile.active_properties());
            println!("Anchors: {:?}", run.profile.anchors());
            println!(
                "(thresholds: min-match-rate={:.2}, min-anchors={})\n",
                config.matcher.min_match_rate, config.matcher.min_anchors
            );
            for result in &run.outcome.results {
                println!("{}\n", describe(result));
            }
            println!("{}", run.summary);
        }
    }

    Ok(())
}
