use itemsieve::{Engine, Item, Settings};
use tracing_subscriber::EnvFilter;

const SETTINGS: &str = r#"{
    "engine": { "stream_interval_ms": 2, "report_chunk_size": 3 },
    "rules": [
        { "kind": "glob", "pattern": "*.tmp", "label": "Temporary files" },
        { "kind": "glob", "pattern": "*/Downloads/*.iso" },
        { "kind": "glob", "pattern": "*secret*" }
    ]
}"#;

fn recent_items() -> Vec<Item> {
    vec![
        Item::new("1", "file:///home/me/notes.txt"),
        Item::new("2", "file:///home/me/Downloads/debian.iso"),
        Item::new("3", "file:///tmp/secret-build.tmp"),
        Item::new("4", ""),
        Item::new("5", "file:///home/me/Pictures/cat.png"),
    ]
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = Settings::from_json(SETTINGS)?;
    let engine = Engine::new(settings.engine.clone())?;
    engine.set_rules(settings.rules).await?;

    // Background-style monitoring: matches arrive as events.
    let mut events = engine.subscribe()?;
    engine.classify_streaming(recent_items()).await?;
    while let Ok(event) = events.try_recv() {
        println!("stream  {} -> {}", event.key, event.verdict);
    }

    // Interactive full analysis: one row per item, every matching rule.
    for row in engine.classify_report(recent_items()).await? {
        println!("report  {row}");
    }

    // A superseded request is not an error worth showing.
    let stale = engine.classify_report(recent_items());
    let fresh = engine.classify_report(recent_items());
    if let Err(err) = stale.await
        && err.is_cancellation()
    {
        println!("stale request dropped: {err}");
    }
    println!("fresh request returned {} rows", fresh.await?.len());

    engine.teardown();
    Ok(())
}
