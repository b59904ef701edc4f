//! Codeplug inspection utility
//! Loads a saved codeplug image, decodes it and prints what the radio holds

use anytone_codeplug::config::ChannelMode;
use anytone_codeplug::core::format_mhz;
use anytone_codeplug::formats::img::load_img;
use anytone_codeplug::models::{get_model, init_models, list_models};
use std::env;
use tracing_subscriber::{fmt::format::FmtSpan, prelude::*, EnvFilter};

fn main() -> anyhow::Result<()> {
    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    let format_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(format_layer)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 && args.len() != 4 {
        eprintln!("Usage: {} <file.img> [vendor model]", args[0]);
        eprintln!("Example: {} radio.img AnyTone AT-D878UV", args[0]);
        eprintln!("\nThe model is taken from the file's metadata when omitted.");
        std::process::exit(1);
    }

    init_models();

    let img_file = &args[1];
    println!("Loading .img file: {}", img_file);
    let (mut image, metadata) = load_img(img_file)?;

    let (vendor, model) = match (args.get(2), args.get(3)) {
        (Some(vendor), Some(model)) => (vendor.clone(), model.clone()),
        _ => (metadata.vendor.clone(), metadata.model.clone()),
    };
    let Some(info) = get_model(&vendor, &model) else {
        let known: Vec<String> = list_models().iter().map(|m| m.full_name()).collect();
        anyhow::bail!(
            "Unknown model '{} {}', known models: {}",
            vendor,
            model,
            known.join(", ")
        );
    };

    println!("Radio: {}", info.full_name());
    if !metadata.crate_version.is_empty() {
        println!("Written by version: {}", metadata.crate_version);
    }
    println!(
        "Image: {} regions, {} bytes\n",
        image.len(),
        image.allocated_bytes()
    );

    let codeplug = info.codeplug();
    codeplug.allocate_for_decoding(&mut image)?;
    let decoded = codeplug.decode(&image)?;
    let config = &decoded.config;

    println!("Radio IDs:");
    for id in &config.radio_ids {
        println!("  {:<16} {}", id.name, id.number);
    }

    println!("\nChannels ({}):", config.channels.len());
    for (i, channel) in config.channels.iter().enumerate() {
        let mode = match &channel.mode {
            ChannelMode::Analog(_) => "FM".to_string(),
            ChannelMode::Digital(d) => format!("DMR CC{} {:?}", d.color_code, d.time_slot),
        };
        println!(
            "  {:4} {:<16} RX {} TX {} {:?} {}",
            i + 1,
            channel.name,
            format_mhz(channel.rx_frequency),
            format_mhz(channel.tx_frequency),
            channel.power,
            mode
        );
    }

    println!("\nZones ({}):", config.zones.len());
    for zone in &config.zones {
        println!("  {:<16} A: {} B: {}", zone.name, zone.a.len(), zone.b.len());
    }

    println!(
        "\nContacts: {}  DTMF contacts: {}  Group lists: {}  Scan lists: {}  GPS systems: {}",
        config.contacts.len(),
        config.dtmf_contacts.len(),
        config.group_lists.len(),
        config.scan_lists.len(),
        config.gps_systems.len()
    );

    if !decoded.warnings.is_empty() {
        println!("\nWarnings ({}):", decoded.warnings.len());
        for warning in &decoded.warnings {
            println!("  {}", warning);
        }
    }

    Ok(())
}
