use anyhow::{Context, Result};
use std::env;
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

use field_timestamps::{Order, OrderRecord, OrderStatus, TimestampRegistry};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() > 1 && args[1] == "inspect" {
        // Inspect mode: rehydrate an order record read from stdin
        run_inspect()?;
    } else {
        run_demo()?;
    }

    Ok(())
}

fn run_demo() -> Result<()> {
    println!("📦 Field timestamps demo (v{})", field_timestamps::VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let mut order = Order::new(2);
    println!("\n🆕 Created order {}", order.id());
    print_timestamps(&order.timestamps().snapshot());

    println!("\n✏️  Paying, adding a note, bumping quantity...");
    order.set_status(OrderStatus::Paid);
    order.set_note("leave at the door");
    order.set_quantity(3);
    print_timestamps(&order.timestamps().snapshot());

    println!("\n🚚 Shipping...");
    order.set_status(OrderStatus::Shipped);
    order.set_status(OrderStatus::Delivered);
    println!("✓ Status: {}", order.status().as_str());
    println!("✓ Shipped at: {:?}", order.shipped_at());

    println!("\n💾 Persisted form:");
    let record = order.to_record();
    let json = serde_json::to_string_pretty(&record)?;
    println!("{}", json);

    let restored = Order::from_record(serde_json::from_str(&json)?);
    println!("\n♻️  Rehydrated order {}", restored.id());
    print_timestamps(&restored.timestamps().snapshot());

    Ok(())
}

fn run_inspect() -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read order record from stdin")?;

    let record: OrderRecord = serde_json::from_str(&input).context("invalid order record JSON")?;
    let order = Order::from_record(record);

    println!("🔍 Order {} ({}, qty {})", order.id(), order.status().as_str(), order.quantity());
    let registry = order.timestamps().snapshot();
    print_timestamps(&registry);

    if !registry.is_consistent() {
        tracing::warn!(order = %order.id(), "timestamps are inconsistent (updated_at earlier than created_at or a field)");
    }

    Ok(())
}

fn print_timestamps(registry: &TimestampRegistry) {
    println!("   created_at: {}", registry.created_at());
    println!("   updated_at: {}", registry.updated_at());

    let mut fields: Vec<_> = registry.iter().collect();
    fields.sort_by_key(|(key, _)| *key);
    for (key, at) in fields {
        println!("   {:<12} {}", key, at);
    }
}
