use daily_guess::cli::{CliInterface, parse_cli};
use daily_guess::config::EngineConfig;
use daily_guess::enrich::IllustrationSource;
use daily_guess::events::LogListener;
use daily_guess::game_state::{DailyGame, play_daily};
use daily_guess::lexicon::WordListLexicon;
use daily_guess::logging;
use daily_guess::runner::Services;
use daily_guess::sink::{BackgroundSink, JsonlSink, LogSink};
use daily_guess::source::CatalogSource;
use daily_guess::store::{FileStore, MemoryStore, SessionStore, default_store_dir};
use std::io;
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    logging::init(log::LevelFilter::Warn);
    let cli = parse_cli();

    let config = match &cli.config_path {
        Some(path) => match EngineConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config from '{}': {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => EngineConfig::default(),
    };

    let catalog = match &cli.catalog_path {
        Some(path) => CatalogSource::load(path),
        None => CatalogSource::embedded(),
    };
    let catalog = match catalog {
        Ok(catalog) => Arc::new(catalog),
        Err(e) => {
            eprintln!("Failed to load puzzle catalog: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut lexicon = WordListLexicon::embedded();
    if let Some(path) = &cli.lexicon_path {
        match lexicon.load_file(cli.domain, path) {
            Ok(count) => log::info!("loaded {count} {} entries", cli.domain),
            Err(e) => {
                eprintln!("Failed to load lexicon from '{}': {e}", path.display());
                return ExitCode::FAILURE;
            }
        }
    }

    let mut store: Box<dyn SessionStore> = match cli.store_dir.clone().or_else(default_store_dir) {
        Some(dir) => Box::new(FileStore::new(dir)),
        None => {
            log::warn!("no data directory; progress will not be saved");
            Box::new(MemoryStore::new())
        }
    };

    let sink = match &cli.results_path {
        Some(path) => BackgroundSink::spawn(JsonlSink::new(path)),
        None => BackgroundSink::spawn(LogSink),
    };

    let date = cli
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let illustrations: Arc<dyn IllustrationSource> = catalog.clone();
    let game = DailyGame {
        source: &*catalog,
        lexicon: &lexicon,
        config: &config,
        domain: cli.domain,
        date,
        hard_mode: cli.hard,
        illustrations: Some(illustrations),
    };

    let services = Services::new(&mut *store, &sink).with_listener(LogListener);
    let mut interface = CliInterface::new(io::stdin().lock());
    play_daily(&game, services, &mut interface);

    sink.shutdown();
    ExitCode::SUCCESS
}
