use std::io;
use std::path::{Path, PathBuf};
use std::process;

use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand};

use platform_art::catalog::IosLayout;
use platform_art::commands;
use platform_art::commands::generate::RunError;
use platform_art::generate::RunSummary;
use platform_art::report::Reporter;
use platform_art::settings::{DEFAULT_CONFIG, DEFAULT_ICON, DEFAULT_SPLASH, Settings};

const EXIT_ABORTED: i32 = 1;
const EXIT_ASSET_FAILURES: i32 = 2;

#[derive(Parser)]
#[command(name = "platform-art")]
#[command(about = "Generate platform icons and splash screens for a hybrid mobile project")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    generate: GenerateArgs,

    /// Log filter used when RUST_LOG is unset (e.g. "debug", "platform_art=trace")
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate icons and splash screens for every detected platform (default)
    Generate(GenerateArgs),
    /// Print the effective asset catalog as JSON
    Catalog(CatalogArgs),
}

#[derive(Args, Clone)]
struct CatalogSelection {
    /// Use the pre-asset-catalog iOS layout (Resources/icons, Resources/splash)
    #[arg(long)]
    xcode_old: bool,

    /// Load the platform catalog from a JSON file instead of the built-in one
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Only handle these platforms (comma-separated ids, e.g. ios,android)
    #[arg(long, value_delimiter = ',')]
    platforms: Vec<String>,
}

#[derive(Args, Clone)]
struct GenerateArgs {
    /// Source icon image
    #[arg(short, long, value_name = "FILE")]
    icon: Option<PathBuf>,

    /// Source splash image; naming it makes the icon optional
    #[arg(short, long, value_name = "FILE")]
    splash: Option<PathBuf>,

    /// Project config file [default: config.xml]; its directory is the project root
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Background composited under icons on platforms that want one
    #[arg(short, long, value_name = "FILE")]
    background: Option<PathBuf>,

    /// Write assets to <DIR>/<platform>/<icon|splash> instead of the platform trees
    #[arg(long, value_name = "DIR")]
    resource_path: Option<PathBuf>,

    /// Worker threads per batch (defaults to one per core)
    #[arg(short, long)]
    jobs: Option<usize>,

    #[command(flatten)]
    selection: CatalogSelection,
}

#[derive(Args)]
struct CatalogArgs {
    #[command(flatten)]
    selection: CatalogSelection,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);
    let command = cli.into_command().unwrap_or_else(|e| e.exit());

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Error: cannot determine working directory: {}", e);
            process::exit(EXIT_ABORTED);
        }
    };

    let code = match command {
        Commands::Generate(args) => generate(args.into_settings(&cwd)),
        Commands::Catalog(args) => catalog(args.selection.into_settings(&cwd)),
    };
    process::exit(code);
}

impl Cli {
    /// The command to run. Generate flags given before a subcommand are
    /// rejected rather than silently dropped.
    fn into_command(self) -> Result<Commands, clap::Error> {
        match self.command {
            None => Ok(Commands::Generate(self.generate)),
            Some(command) if self.generate.is_default() => Ok(command),
            Some(_) => Err(Cli::command().error(
                ErrorKind::ArgumentConflict,
                "generate options must follow the subcommand (or omit the subcommand)",
            )),
        }
    }
}

fn generate(settings: Settings) -> i32 {
    let mut reporter = Reporter::stdout();
    let result = commands::generate::run(&settings, &mut reporter);
    reporter.blank();
    exit_code(&result)
}

fn exit_code(result: &Result<RunSummary, RunError>) -> i32 {
    match result {
        Ok(summary) if summary.is_success() => 0,
        Ok(_) => EXIT_ASSET_FAILURES,
        Err(_) => EXIT_ABORTED,
    }
}

fn catalog(settings: Settings) -> i32 {
    match commands::catalog::run(&settings, &mut io::stdout()) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ABORTED
        }
    }
}

impl CatalogSelection {
    fn is_default(&self) -> bool {
        !self.xcode_old && self.catalog.is_none() && self.platforms.is_empty()
    }

    fn into_settings(self, cwd: &Path) -> Settings {
        let mut settings = Settings::in_dir(cwd);
        self.apply(&mut settings, cwd);
        settings
    }

    fn apply(self, settings: &mut Settings, cwd: &Path) {
        settings.ios_layout = if self.xcode_old {
            IosLayout::Legacy
        } else {
            IosLayout::AssetCatalog
        };
        settings.catalog = self.catalog.map(|p| cwd.join(p));
        settings.platforms = self.platforms;
    }
}

impl GenerateArgs {
    fn is_default(&self) -> bool {
        self.icon.is_none()
            && self.splash.is_none()
            && self.config.is_none()
            && self.background.is_none()
            && self.resource_path.is_none()
            && self.jobs.is_none()
            && self.selection.is_default()
    }

    fn into_settings(self, cwd: &Path) -> Settings {
        let mut settings = Settings::in_dir(cwd);
        settings.splash_requested = self.splash.is_some();
        settings.icon = cwd.join(self.icon.unwrap_or_else(|| PathBuf::from(DEFAULT_ICON)));
        settings.splash = cwd.join(self.splash.unwrap_or_else(|| PathBuf::from(DEFAULT_SPLASH)));
        settings.config = cwd.join(self.config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG)));
        settings.background = self.background.map(|p| cwd.join(p));
        settings.resource_path = self.resource_path.map(|p| cwd.join(p));
        settings.jobs = self.jobs;
        self.selection.apply(&mut settings, cwd);
        settings
    }
}

/// RUST_LOG wins over `--log-level`.
fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform_art::catalog::{AssetKind, AssetSpec};
    use platform_art::generate::{GenerationResult, Outcome};
    use platform_art::preflight::PreflightError;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    fn generate_settings(args: &[&str]) -> Settings {
        match parse(args).into_command().unwrap() {
            Commands::Generate(args) => args.into_settings(Path::new("/work/app")),
            Commands::Catalog(_) => panic!("expected generate"),
        }
    }

    fn catalog_platforms(cli: Cli) -> Vec<String> {
        match cli.into_command().unwrap() {
            Commands::Catalog(args) => args.selection.platforms,
            Commands::Generate(_) => panic!("expected catalog"),
        }
    }

    #[test]
    fn log_level_before_or_after_subcommand() {
        let before = parse(&["platform-art", "--log-level", "debug", "catalog", "--platforms", "web"]);
        assert_eq!(before.log_level, "debug");
        assert_eq!(catalog_platforms(before), vec!["web"]);

        let after = parse(&["platform-art", "catalog", "--log-level", "debug", "--platforms", "web"]);
        assert_eq!(after.log_level, "debug");
        assert_eq!(catalog_platforms(after), vec!["web"]);
    }

    #[test]
    fn generate_is_the_default_command() {
        let settings = generate_settings(&["platform-art"]);

        assert_eq!(settings.config, PathBuf::from("/work/app/config.xml"));
        assert_eq!(settings.icon, PathBuf::from("/work/app/icon.png"));
        assert!(!settings.splash_requested);
        assert_eq!(settings.ios_layout, IosLayout::AssetCatalog);
        assert_eq!(parse(&["platform-art"]).log_level, "warn");
    }

    #[test]
    fn splash_flag_marks_splash_requested() {
        let settings = generate_settings(&["platform-art", "-s", "art/splash.png"]);

        assert!(settings.splash_requested);
        assert_eq!(settings.splash, PathBuf::from("/work/app/art/splash.png"));
        assert!(!settings.icon_request().required);
    }

    #[test]
    fn generate_flags_map_to_settings() {
        let settings = generate_settings(&[
            "platform-art",
            "generate",
            "--xcode-old",
            "--platforms",
            "ios,android",
            "-j",
            "2",
            "-c",
            "project/config.xml",
            "--resource-path",
            "res",
        ]);

        assert_eq!(settings.ios_layout, IosLayout::Legacy);
        assert_eq!(settings.platforms, vec!["ios", "android"]);
        assert_eq!(settings.jobs, Some(2));
        assert_eq!(settings.project_root(), PathBuf::from("/work/app/project"));
        assert_eq!(settings.resource_path, Some(PathBuf::from("/work/app/res")));
    }

    #[test]
    fn generate_flags_before_subcommand_are_rejected() {
        let cli = parse(&["platform-art", "--icon", "a.png", "catalog"]);
        let err = cli.into_command().err().unwrap();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn exit_codes() {
        let mut summary = RunSummary::default();
        summary.results.push(GenerationResult {
            platform: "android".to_string(),
            kind: AssetKind::Icon,
            asset: AssetSpec::square("drawable/icon.png", 96),
            path: PathBuf::from("drawable/icon.png"),
            outcome: Outcome::Written,
        });
        assert_eq!(exit_code(&Ok(summary.clone())), 0);

        summary.results[0].outcome = Outcome::Failed {
            reason: "disk full".to_string(),
        };
        assert_eq!(exit_code(&Ok(summary)), EXIT_ASSET_FAILURES);

        let aborted = Err(RunError::Preflight(PreflightError::NoPlatformsDetected));
        assert_eq!(exit_code(&aborted), EXIT_ABORTED);
    }
}
