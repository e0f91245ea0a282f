use tbt_core::TxConfig;
use tbt_phy::TransmitterBuilder;

/// Usage: `tenbase-tx [config.toml] [ticks]`
///
/// Simulates the transmitter from a primed scheduler, so the first frame
/// starts on tick zero, then prints every frame recovered from the line.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => TxConfig::load(path)?,
        None => TxConfig::default(),
    };
    let ticks = args.next().map(|raw| raw.parse::<u64>()).transpose()?;

    let mut tx = TransmitterBuilder::new()
        .with_config(config)
        .primed(true)
        .build()?;

    let ticks = ticks.unwrap_or_else(|| tx.capture_ticks());
    let waveform = tx.run(ticks);

    tracing::info!(
        "Simulated {} ticks, {} frame(s) started",
        tx.ticks(),
        tx.frames_started()
    );
    for (n, frame) in waveform.decode_manchester().iter().enumerate() {
        let hex: Vec<String> = frame.iter().map(|b| format!("{:02X}", b)).collect();
        println!("frame {} ({} bytes): {}", n, frame.len(), hex.join(" "));
    }
    Ok(())
}
