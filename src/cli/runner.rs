//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, PageArgs};
use crate::config::PaginatorConfig;
use crate::error::{Error, Result, ResultExt};
use crate::pagination::{AsyncPaginator, PaginatorStats};
use crate::source::{RecordFormat, RecordSource};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let mut out = BufWriter::new(std::io::stdout());
        match &self.cli.command {
            Commands::Page(args) => self.page(args, &mut out).await.map(|_| ()),
            Commands::CheckConfig => self.check_config(&mut out),
        }
    }

    /// Page through the input file, writing one JSON record per line
    pub async fn page<W: Write>(&self, args: &PageArgs, out: &mut W) -> Result<PaginatorStats> {
        let config = self.resolve_config(args)?;
        debug!(
            "Using base limit {} and max limit {:?}",
            config.base_limit, config.max_limit
        );

        let contents = read_input(&args.input).await?;
        let source = RecordSource::parse(
            &contents,
            RecordFormat::from_path(&args.input),
            args.param.clone(),
            args.kind.into(),
            args.order.into(),
        )
        .with_context(|| format!("Failed to load records from {}", args.input.display()))?;
        info!(
            "Loaded {} records from {}",
            source.len(),
            args.input.display()
        );

        let mut paginator = AsyncPaginator::from_config(source, &config)?;
        let take = args.take.unwrap_or(usize::MAX);
        let mut written = 0;
        while written < take && paginator.has_next().await? {
            let record = paginator.next_item().await?;
            serde_json::to_writer(&mut *out, &record.value)?;
            writeln!(out)?;
            written += 1;
        }
        out.flush()?;

        let stats = *paginator.stats();
        info!(
            "Wrote {} records in {} fetches",
            written, stats.fetches
        );
        if args.stats {
            eprintln!("{}", serde_json::to_string(&stats)?);
        }
        Ok(stats)
    }

    /// Load the config file and print the validated limits
    pub fn check_config<W: Write>(&self, out: &mut W) -> Result<()> {
        if self.cli.config.is_none() {
            return Err(Error::config("Config file not specified (use -C flag)"));
        }
        let config = self.load_config()?;
        writeln!(out, "{}", serde_json::to_string_pretty(&config)?)?;
        out.flush()?;
        Ok(())
    }

    fn load_config(&self) -> Result<PaginatorConfig> {
        match &self.cli.config {
            Some(path) => PaginatorConfig::from_file(path),
            None => Ok(PaginatorConfig::default()),
        }
    }

    /// Config file limits with command-line overrides applied
    fn resolve_config(&self, args: &PageArgs) -> Result<PaginatorConfig> {
        let mut config = self.load_config()?;
        if let Some(limit) = args.limit {
            config.base_limit = limit;
        }
        if let Some(max_limit) = args.max_limit {
            config.max_limit = Some(max_limit);
        }
        config.validate()?;
        Ok(config)
    }
}

async fn read_input(path: &Path) -> Result<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => Ok(contents),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::FileNotFound {
            path: path.display().to_string(),
        }),
        Err(e) => Err(e.into()),
    }
}
