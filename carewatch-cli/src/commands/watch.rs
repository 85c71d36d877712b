use colored::Colorize;
use tracing::warn;

use carewatch_core::{ApiConfig, CallMonitor, CarewatchConfig};

use crate::config::CliConfig;

/// Run the call monitor in the foreground, printing directory and roster
/// changes until interrupted.
pub async fn handle_watch_command(config: &CliConfig) -> anyhow::Result<()> {
    let core_config = CarewatchConfig {
        api: ApiConfig {
            base_url: config.api_url.clone(),
            ..Default::default()
        },
        ..Default::default()
    };

    let monitor = CallMonitor::new(&core_config, config.token_store());
    monitor.start().await?;

    println!(
        "{} {}",
        "Watching call rooms at".cyan(),
        config.api_url.bold()
    );
    println!("  {}", "Press Ctrl-C to stop".dimmed());
    println!();

    let mut rooms_rx = monitor.directory().subscribe();
    let mut roster_rx = monitor.roster().subscribe();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!();
                println!("{}", "Stopping...".yellow());
                break;
            }
            changed = rooms_rx.changed() => {
                if changed.is_err() {
                    warn!("Directory feed closed");
                    break;
                }
                let rooms = rooms_rx.borrow_and_update().clone();
                let monitorable = rooms.iter().filter(|r| r.has_visitors()).count();
                println!(
                    "  {} {} active room(s), {} with visitors, {} session(s) connected",
                    "rooms".blue().bold(),
                    rooms.len(),
                    monitorable,
                    monitor.pool().len().await
                );
            }
            changed = roster_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let roster = roster_rx.borrow_and_update().clone();
                for participant in &roster {
                    let mic = if participant.muted { "muted" } else { "live" };
                    let camera = if participant.camera_off { "off" } else { "on" };
                    println!(
                        "  {} {} (mic: {}, camera: {}){}",
                        "roster".green().bold(),
                        participant.name,
                        mic,
                        camera,
                        if participant.speaking { " speaking" } else { "" }
                    );
                }
            }
        }
    }

    monitor.stop().await;

    if let Some(error) = monitor.status().await.last_error {
        eprintln!("{}: {}", "Last error".red().bold(), error);
    }

    Ok(())
}
