use std::{num::NonZeroU64, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    load_settings,
    screens::{
        CommentForm, CommentSource, CommentsSection, DetailScreen, FormOptions, ListScreen,
        ListView, Lookup, Navigation, SampleListScreen, SampleSource,
    },
    validation::SampleForm,
    ClientSettings, HttpSampleApi, PageWindow, SampleApi,
};
use serde::Serialize;
use shared::{
    domain::BioSampleId,
    protocol::{BioSample, Comment},
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "biosample", about = "Browse and edit biosamples")]
struct Cli {
    /// Overrides `api_base_url` from client.toml and the environment.
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    /// Print results as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List {
        #[arg(long, default_value_t = 1)]
        page: u64,
    },
    Show {
        id: i64,
    },
    Create(SampleFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: SampleFields,
    },
    Delete {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
    Comments {
        id: i64,
        #[arg(long, default_value_t = 1)]
        page: u64,
    },
    Comment {
        id: i64,
        #[arg(long)]
        content: String,
        #[arg(long)]
        author: String,
    },
    Operators {
        /// Only names containing this text.
        filter: Option<String>,
    },
    SampleTypes {
        filter: Option<String>,
    },
}

/// Sample fields; on `update` an omitted field keeps its current value.
#[derive(Args, Debug)]
struct SampleFields {
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    sample_type: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    operator: Option<String>,
}

impl SampleFields {
    fn apply_to(self, form: &mut SampleForm) {
        let SampleFields {
            location,
            sample_type,
            date,
            operator,
        } = self;
        for (value, slot) in [
            (location, &mut form.location),
            (sample_type, &mut form.sample_type_name),
            (date, &mut form.sampling_date),
            (operator, &mut form.operator_name),
        ] {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

fn settings_for(cli: &Cli) -> ClientSettings {
    let mut settings = load_settings();
    if let Some(url) = &cli.api_url {
        settings.api_base_url = url.clone();
    }
    if let Some(secs) = cli.timeout_secs {
        settings.request_timeout_secs = secs;
    }
    settings
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = settings_for(&cli);
    let api: Arc<dyn SampleApi> = Arc::new(
        HttpSampleApi::new(&settings).context("failed to set up the biosample API client")?,
    );
    info!(base_url = %settings.api_base_url, "using biosample API");
    let out = Output { json: cli.json };

    match cli.command {
        Command::List { page } => {
            let mut screen: SampleListScreen =
                ListScreen::new(SampleSource::new(api), settings.samples_per_page);
            screen.load().await?;
            if page != 1 && !screen.go_to_page(page).await? {
                bail!(
                    "page {page} is out of range (1..={})",
                    screen.pagination().total_pages()
                );
            }
            match screen.view() {
                ListView::Ready { items, page, .. } => out.samples(&items, &page)?,
                ListView::Failed { message } => bail!(message),
                ListView::Loading => {}
            }
        }
        Command::Show { id } => {
            let mut screen = DetailScreen::new(api, BioSampleId(id), settings.comments_per_page);
            match screen.load().await? {
                Lookup::Found(sample) => {
                    out.sample(&sample)?;
                    if let Some(section) = screen.comments() {
                        out.comments(&section.items(), &section.pagination().window())?;
                    }
                }
                Lookup::NotFound | Lookup::NotFetched => bail!("biosample {id} not found"),
            }
        }
        Command::Create(fields) => {
            let mut form = SampleForm::default();
            fields.apply_to(&mut form);
            let draft = form.validate()?;
            let mut screen: SampleListScreen =
                ListScreen::new(SampleSource::new(api), settings.samples_per_page);
            screen.open_create();
            let created = screen.submit_create(draft).await?;
            out.sample(&created)?;
        }
        Command::Update { id, fields } => {
            let mut screen = DetailScreen::new(api, BioSampleId(id), settings.comments_per_page);
            let Lookup::Found(current) = screen.load().await? else {
                bail!("biosample {id} not found");
            };
            let mut form = SampleForm::from_sample(&current);
            fields.apply_to(&mut form);
            let draft = form.validate()?;
            screen.open_edit();
            if let Some(updated) = screen.submit_edit(draft).await? {
                out.sample(&updated)?;
            }
        }
        Command::Delete { id, yes } => {
            let mut screen = DetailScreen::new(api, BioSampleId(id), settings.comments_per_page);
            if screen.load().await?.found().is_none() {
                bail!("biosample {id} not found");
            }
            screen.request_delete();
            if !yes {
                bail!("refusing to delete biosample {id} without --yes");
            }
            if screen.confirm_delete().await? == Navigation::BackToList {
                println!("deleted biosample {id}");
            }
        }
        Command::Comments { id, page } => {
            let mut section = comments_section(api, id, settings.comments_per_page);
            section.load().await?;
            if page != 1 && !section.go_to_page(page).await? {
                bail!(
                    "page {page} is out of range (1..={})",
                    section.pagination().total_pages()
                );
            }
            out.comments(&section.items(), &section.pagination().window())?;
        }
        Command::Comment {
            id,
            content,
            author,
        } => {
            let mut section = comments_section(api, id, settings.comments_per_page);
            let mut form = CommentForm::with_values(content, author);
            let comment = form.submit(&mut section).await?;
            out.comments(&[comment], &section.pagination().window())?;
        }
        Command::Operators { filter } => {
            let options = FormOptions::new();
            options.load(api.as_ref()).await?;
            out.names(&options.matching_operators(filter.as_deref().unwrap_or_default()))?;
        }
        Command::SampleTypes { filter } => {
            let options = FormOptions::new();
            options.load(api.as_ref()).await?;
            out.names(&options.matching_sample_types(filter.as_deref().unwrap_or_default()))?;
        }
    }

    Ok(())
}

fn comments_section(api: Arc<dyn SampleApi>, id: i64, per_page: NonZeroU64) -> CommentsSection {
    ListScreen::new(CommentSource::new(api, BioSampleId(id)), per_page)
}

struct Output {
    json: bool,
}

impl Output {
    fn print_json(&self, value: &impl Serialize) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    fn sample(&self, sample: &BioSample) -> Result<()> {
        if self.json {
            return self.print_json(sample);
        }
        println!("#{} {}", sample.id, sample.location);
        println!("  type:     {}", sample.sample_type_name);
        println!("  sampled:  {}", sample.sampling_date);
        println!("  operator: {}", sample.operator_name);
        Ok(())
    }

    fn samples(&self, samples: &[BioSample], page: &PageWindow) -> Result<()> {
        if self.json {
            return self.print_json(&samples);
        }
        for sample in samples {
            println!(
                "#{:<6} {:<24} {:<12} {}  {}",
                sample.id.0,
                sample.location,
                sample.sample_type_name,
                sample.sampling_date,
                sample.operator_name
            );
        }
        print_page_footer(page, "samples");
        Ok(())
    }

    fn comments(&self, comments: &[Comment], page: &PageWindow) -> Result<()> {
        if self.json {
            return self.print_json(&comments);
        }
        for comment in comments {
            println!(
                "[{}] {}: {}",
                comment.created_at.format("%Y-%m-%d %H:%M"),
                comment.author,
                comment.content
            );
        }
        print_page_footer(page, "comments");
        Ok(())
    }

    fn names(&self, names: &[String]) -> Result<()> {
        if self.json {
            return self.print_json(&names);
        }
        for name in names {
            println!("{name}");
        }
        Ok(())
    }
}

fn print_page_footer(page: &PageWindow, noun: &str) {
    if page.total_count == 0 {
        println!("no {noun}");
    } else if page.shows_controls() {
        println!(
            "page {}/{} ({} {noun})",
            page.current_page, page.total_pages, page.total_count
        );
    }
}
