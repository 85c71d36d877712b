use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};

use carewatch_core::{AdminApiClient, RoomsSnapshot};

use crate::config::CliConfig;

pub async fn handle_rooms_command(config: &CliConfig, json: bool) -> anyhow::Result<()> {
    let client = AdminApiClient::new(config.api_url.clone(), config.token_store());
    let snapshot = client.rooms_snapshot().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("{}", "Active Call Rooms".cyan().bold());
    println!();

    if snapshot.rooms.is_empty() {
        println!("  {}", "No active rooms".dimmed());
        return Ok(());
    }

    println!("{}", render_rooms_table(&snapshot));
    println!();
    println!(
        "  {} room(s), {} participant(s), {} monitorable",
        snapshot.rooms.len(),
        snapshot.total_participants,
        snapshot.rooms.iter().filter(|r| r.has_visitors()).count()
    );

    Ok(())
}

fn render_rooms_table(snapshot: &RoomsSnapshot) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Room",
            "Visitors",
            "Participants",
            "Publishers",
            "Created",
        ]);

    for room in &snapshot.rooms {
        table.add_row(vec![
            Cell::new(&room.name),
            Cell::new(room.visitor_count()),
            Cell::new(room.participant_count),
            Cell::new(room.publisher_count),
            Cell::new(
                room.created_at
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use carewatch_core::{ParticipantDescriptor, RoomDescriptor};

    #[test]
    fn test_table_lists_rooms_with_visitor_counts() {
        let snapshot = RoomsSnapshot {
            rooms: vec![
                RoomDescriptor::new("room1").with_participants(vec![
                    ParticipantDescriptor::new("user_1", "Edna"),
                    ParticipantDescriptor::new("admin_5", "Pat"),
                ]),
                RoomDescriptor::new("room2"),
            ],
            ..Default::default()
        };

        let rendered = render_rooms_table(&snapshot).to_string();
        assert!(rendered.contains("room1"));
        assert!(rendered.contains("room2"));
        assert!(rendered.contains("Visitors"));
    }
}
