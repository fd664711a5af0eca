use bacwire_core::encoding::encode::Encode;
use bacwire_tools::{build_who_is, format_hex};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "bacwire-whois", about = "Print a Who-Is BACnet/IP frame as hex")]
struct Args {
    #[arg(long, requires = "high")]
    low: Option<u32>,
    #[arg(long, requires = "low")]
    high: Option<u32>,
    /// Remote network to broadcast on; 65535 reaches every network.
    #[arg(long)]
    network: Option<u16>,
    /// Wrap in Original-Unicast-NPDU instead of Original-Broadcast-NPDU.
    #[arg(long)]
    unicast: bool,
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    let range = args.low.zip(args.high);
    let frame = build_who_is(range, args.network, args.unicast);
    log::debug!("built {:?} of {} octets", frame.function(), frame.length());
    if args.json {
        println!("{}", serde_json::to_string_pretty(&frame)?);
    } else {
        println!("{}", format_hex(&frame.to_bytes()?));
    }
    Ok(())
}
