use crate::cli::output::{category_badge, display_replacement};
use crate::session::Session;
use anyhow::{Context, Result};
use colored::*;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;

const KEEP_ORIGINAL: &str = "Keep original";

/// Walk every issue that has suggestions and let the user pick one.
/// Escape stops the walk and leaves the remaining issues as they are.
pub fn review(session: &mut Session, max_candidates: usize, colored: bool) -> Result<()> {
    let total = session.spans().len();

    for index in 0..total {
        let span = session
            .store()
            .and_then(|store| store.get(index).ok())
            .cloned()
            .context("Issue disappeared during review")?;

        if span.candidates().is_empty() {
            continue;
        }

        let original = session
            .store()
            .map(|store| span.excerpt(store.original_text()).to_string())
            .unwrap_or_default();

        let shown: Vec<&String> = span.candidates().iter().take(max_candidates.max(1)).collect();
        let mut items: Vec<String> = shown.iter().map(|c| display_replacement(c)).collect();
        items.push(format!("{} (\"{}\")", KEEP_ORIGINAL, original));

        let current = match span.chosen() {
            Some(chosen) => shown.iter().position(|c| c.as_str() == chosen).unwrap_or(0),
            None => shown.len(),
        };

        eprintln!();
        if colored {
            eprintln!(
                "{} {} {}",
                category_badge(span.category()),
                format!("{}/{}", index + 1, total).blue().bold(),
                span.message()
            );
        } else {
            eprintln!(
                "[{}] {}/{} {}",
                span.category().as_str().to_uppercase(),
                index + 1,
                total,
                span.message()
            );
        }

        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Replace \"{}\" with", original))
            .items(&items)
            .default(current)
            .interact_opt()
            .context("Failed to read selection")?;

        let Some(choice) = choice else {
            log::info!("Review stopped at issue {}", index);
            break;
        };

        let value = shown.get(choice).map(|c| c.as_str());
        session.select(index, value)?;
    }

    Ok(())
}
