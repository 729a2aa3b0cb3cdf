//! Watches the dashboard and prints every published snapshot.
//!
//! # Usage
//!
//! ```bash
//! export INOPEN_API_TOKEN="your.jwt.token"
//! cargo run --example dashboard
//! ```
//!
//! Each Enter keypress triggers another refresh; Ctrl-D exits.

use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use inopen_dashboard::observability::{init_subscriber, LogConfig};
use inopen_dashboard::{DashboardClient, DashboardSnapshot, DashboardStore};

fn render(snapshot: &DashboardSnapshot) {
    println!("=== Dashboard ({:?}) ===", snapshot.fetched_at);

    println!("Top links:");
    for link in &snapshot.top_links {
        println!("  {:>6}  {}  {}", link.total_clicks, link.title, link.web_link);
    }

    println!("Recent links:");
    for link in &snapshot.recent_links {
        println!("  {:>12}  {}  {}", link.times_ago, link.title, link.smart_link);
    }

    let mut points = snapshot.chart_points.clone();
    points.sort_by(|a, b| a.label.cmp(&b.label));
    println!("Clicks:");
    for point in points {
        println!("  {:<8} {}", point.label, "#".repeat(point.value.max(0.0) as usize));
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_subscriber(&LogConfig::default());

    let client = DashboardClient::from_env()?;
    let store = DashboardStore::start(Arc::new(client))?;
    let mut updates = store.subscribe();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = Arc::clone(&*updates.borrow_and_update());
                render(&snapshot);
            }
            line = lines.next_line() => {
                match line? {
                    Some(_) => {
                        store.refresh();
                    }
                    None => break,
                }
            }
        }
    }

    Ok(())
}
