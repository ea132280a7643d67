use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use crate::auth::Token;
use crate::config::Config;
use crate::output;
use crate::output::html;
use crate::triage::{AreaLeadTable, ReportGenerator};

#[derive(Parser)]
#[command(name = "prlens")]
#[command(author, version, about = "Community Pull Request Reports", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path the HTML report is written to
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Configuration file (prlens.toml/json/yaml in the current directory by default)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the stale-PR and recognition reports for a repository
    Report {
        #[arg(short, long, env = "GITHUB_TOKEN")]
        token: Option<String>,

        #[arg(short, long)]
        url: Option<String>,

        /// Repository path, e.g. 'dotnet/aspnetcore'
        #[arg(short = 'P', long)]
        project: Option<String>,

        /// Pipe-delimited area-owners document
        #[arg(short, long)]
        area_owners: Option<PathBuf>,

        /// Custom HTML template with ##BODY##, ##RECOGNITIONS## and ##DATE## markers
        #[arg(short = 'T', long)]
        template: Option<PathBuf>,
    },
}

impl Cli {
    async fn execute_report(
        &self,
        token: &Option<String>,
        url: Option<&str>,
        project: Option<&str>,
        area_owners: Option<&PathBuf>,
        template: Option<&PathBuf>,
    ) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;

        // CLI arguments override the configuration file
        let token = token
            .clone()
            .or_else(|| config.github.token.clone())
            .map(|t| Token::from(t.as_str()));
        let url = url
            .map(str::to_string)
            .unwrap_or_else(|| config.github.base_url.clone());
        let project = project
            .map(str::to_string)
            .or_else(|| config.github.repo_path.clone())
            .context("No repository given; pass --project or set repo-path in the config file")?;

        info!("Generating community PR report for {project}");

        let leads = match area_owners
            .cloned()
            .or_else(|| config.report.area_owners.as_ref().map(PathBuf::from))
        {
            Some(path) => {
                let text = std::fs::read_to_string(&path).with_context(|| {
                    format!("Failed to read area owners document: {}", path.display())
                })?;
                let table = AreaLeadTable::parse(&text, &config.labels.area_prefixes);
                info!("Loaded {} area lead mappings", table.len());
                table
            }
            None => AreaLeadTable::default(),
        };

        let generator = ReportGenerator::new(
            url,
            project,
            token,
            leads,
            config.labels.clone(),
            config.report.clone(),
        )?;

        let report = generator.generate().await?;

        let page_template = html::load_template(template.map(PathBuf::as_path))?;
        let page = html::render_report(&report, &page_template);

        if let Some(output_path) = &self.output {
            std::fs::write(output_path, page).with_context(|| {
                format!("Failed to write report to {}", output_path.display())
            })?;
            info!("Report written to: {}", output_path.display());
        }

        output::print_summary(&report);

        Ok(())
    }

    pub async fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::Report {
                token,
                url,
                project,
                area_owners,
                template,
            } => {
                self.execute_report(
                    token,
                    url.as_deref(),
                    project.as_deref(),
                    area_owners.as_ref(),
                    template.as_ref(),
                )
                .await
            }
        }
    }
}
