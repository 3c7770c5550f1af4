//! `levels` and `list` commands

use anyhow::{anyhow, Result};
use std::io::{self, Write};
use std::time::Duration;
use tokio::task;

use crate::api::TeacherApiClient;
use crate::list_view::ActivityPage;
use crate::model::Level;

pub async fn handle_levels_command(client: &TeacherApiClient, verbose: bool) -> Result<()> {
    let spinner = start_spinner("Fetching levels");
    let levels = client.list_levels().await;
    stop_spinner(spinner).await;
    let levels = levels?;

    if verbose {
        println!("Fetched {} levels from {}", levels.len(), client.base_url());
    }

    print!("{}", format_levels_table(&levels));
    Ok(())
}

pub async fn handle_list_command(
    client: &TeacherApiClient,
    level_id: i64,
    verbose: bool,
) -> Result<()> {
    let spinner = start_spinner("Fetching activities");
    let fetched = async {
        let levels = client.list_levels().await?;
        let activities = client.list_activities_for_level(level_id).await?;
        Ok::<_, crate::error::ApiError>((levels, activities))
    }
    .await;
    stop_spinner(spinner).await;
    let (levels, activities) = fetched?;

    let level = levels
        .into_iter()
        .find(|l| l.id == level_id)
        .ok_or_else(|| anyhow!("Level {} not found", level_id))?;

    if verbose {
        println!("Level {} ({}) has {} activities", level.id, level.name, activities.len());
    }

    print!("{}", ActivityPage::build(&level, &activities).to_text());
    Ok(())
}

fn format_levels_table(levels: &[Level]) -> String {
    if levels.is_empty() {
        return "No levels configured.\n".to_string();
    }

    let mut out = format!("\n{:<6} {:<12} {}\n", "ID", "Name", "Description");
    out.push_str(&"-".repeat(50));
    out.push('\n');
    for level in levels {
        out.push_str(&format!(
            "{:<6} {:<12} {}\n",
            level.id,
            level.name,
            level.description.as_deref().unwrap_or("")
        ));
    }
    out
}

/// Print a spinner on stdout until aborted
fn start_spinner(message: &'static str) -> task::JoinHandle<()> {
    task::spawn(async move {
        let frames = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
        let mut interval = tokio::time::interval(Duration::from_millis(100));
        for i in 0.. {
            interval.tick().await;
            print!("\r{} {}...", frames[i % frames.len()], message);
            let _ = io::stdout().flush();
        }
    })
}

async fn stop_spinner(handle: task::JoinHandle<()>) {
    handle.abort();
    let _ = handle.await;
    print!("\r{}\r", " ".repeat(40));
    let _ = io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_levels_table() {
        let levels = vec![
            Level {
                id: 1,
                name: "A1".to_string(),
                description: Some("Principiante".to_string()),
            },
            Level {
                id: 2,
                name: "A2".to_string(),
                description: None,
            },
        ];
        let table = format_levels_table(&levels);
        assert!(table.contains("ID"));
        assert!(table.lines().any(|l| l.starts_with("1") && l.contains("Principiante")));
        assert!(table.lines().any(|l| l.starts_with("2") && l.contains("A2")));
    }

    #[test]
    fn test_format_empty_levels() {
        assert_eq!(format_levels_table(&[]), "No levels configured.\n");
    }

    #[tokio::test]
    async fn test_spinner_stops() {
        let handle = start_spinner("Testing");
        tokio::time::sleep(Duration::from_millis(20)).await;
        stop_spinner(handle).await;
    }
}
