use bacwire_core::encoding::options::DecodeOptions;
use bacwire_tools::{decode_frame, parse_hex, verify_round_trip, LayerArg};
use clap::Parser;
use std::io::Read;

#[derive(Parser, Debug)]
#[command(name = "bacwire-decode", about = "Decode a BACnet frame given as hex")]
struct Args {
    /// Hex octets; read from stdin when omitted.
    hex: Vec<String>,
    #[arg(long, value_enum, default_value_t = LayerArg::Bvlc)]
    layer: LayerArg,
    /// Fail on reserved or constant fields with unexpected values.
    #[arg(long)]
    strict: bool,
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    let text = if args.hex.is_empty() {
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        input
    } else {
        args.hex.join(" ")
    };
    let bytes = parse_hex(&text)?;
    let options = if args.strict {
        DecodeOptions::strict()
    } else {
        DecodeOptions::lenient()
    };

    let frame = decode_frame(&bytes, args.layer, options)?;
    if args.json {
        println!("{}", frame.to_json()?);
    } else {
        println!("{frame:#?}");
    }
    verify_round_trip(&frame, &bytes)?;
    Ok(())
}
