//! Terminal rendering of a [`DisplayModel`].

use std::io::{self, Write};

use clap::ValueEnum;
use console::style;
use folio::{DisplayModel, RepositoryCard};

/// Output format for the rendered portfolio.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Styled text for the terminal (default)
    #[default]
    Text,
    /// Display model as JSON
    Json,
}

pub(crate) fn render(
    model: &DisplayModel,
    format: OutputFormat,
    out: &mut impl Write,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => render_text(model, out),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, model).map_err(io::Error::other)?;
            writeln!(out)
        }
    }
}

fn render_text(model: &DisplayModel, out: &mut impl Write) -> io::Result<()> {
    if let Some(error) = &model.error {
        writeln!(out, "{}", style(format!(" {error} ")).white().on_red())?;
        writeln!(out)?;
    }

    let profile = &model.profile;
    writeln!(out, "{}", style(&profile.heading).bold())?;
    writeln!(out, "{}", style(&profile.tagline).dim())?;

    let mut links = Vec::new();
    if let Some(url) = &profile.github_url {
        links.push(format!("GitHub {url}"));
    }
    if let Some(url) = &profile.website {
        links.push(format!("Website {url}"));
    }
    if let Some(location) = &profile.location {
        links.push(location.clone());
    }
    if !links.is_empty() {
        writeln!(out, "{}", links.join("  ·  "))?;
    }
    writeln!(out)?;

    let stats = &model.stats;
    writeln!(
        out,
        "{} {}   {} {}   {} {}",
        style("FOLLOWERS").dim(),
        style(&stats.followers).bold(),
        style("PUBLIC REPOS").dim(),
        style(&stats.public_repos).bold(),
        style("FOLLOWING").dim(),
        style(&stats.following).bold(),
    )?;

    if model.show_projects {
        writeln!(out)?;
        write!(out, "{}", style("Highlighted Projects").bold().underlined())?;
        match &model.links.all_repositories_url {
            Some(url) => writeln!(out, "  {}", style(format!("View all → {url}")).cyan())?,
            None => writeln!(out)?,
        }
        for card in &model.repositories {
            writeln!(out)?;
            render_card(card, out)?;
        }
    }

    writeln!(out)?;
    match &model.links.github_url {
        Some(url) => writeln!(
            out,
            "{}  {}",
            style(format!("© {}", profile.brand)).dim(),
            style(format!("GitHub {url}")).dim()
        ),
        None => writeln!(out, "{}", style(format!("© {}", profile.brand)).dim()),
    }
}

fn render_card(card: &RepositoryCard, out: &mut impl Write) -> io::Result<()> {
    writeln!(
        out,
        "  {}  {}",
        style(&card.name).bold(),
        style(format!("★ {}", card.stars)).yellow()
    )?;
    if let Some(description) = &card.description {
        writeln!(out, "  {description}")?;
    }

    let mut meta = Vec::new();
    if let Some(language) = &card.language {
        meta.push(language.clone());
    }
    if card.has_live_demo {
        meta.push("Live".to_string());
    }
    meta.extend(card.topics.iter().map(|t| format!("#{t}")));
    if !meta.is_empty() {
        writeln!(out, "  {}", style(meta.join("  ")).dim())?;
    }

    if let Some(url) = &card.url {
        writeln!(out, "  {}", style(url).cyan())?;
    }
    Ok(())
}
