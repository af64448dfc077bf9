use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use pretty_bytes::converter::convert;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use tftpeer::{
    parse_udp_packet_with, AckPacket, DataPacket, Error, ErrorCode, ErrorPacket, ParseOptions,
    ReadRequestPacket, Serializable, TftpPacket, WriteRequestPacket,
};

/// Inspect and build TFTP packets.
#[derive(Parser, Debug)]
#[command(version, author = "shakram02")]
struct Opts {
    #[command(subcommand)]
    subcmd: SubCommand,
}

#[derive(Subcommand, Debug)]
enum SubCommand {
    /// decode a hex encoded packet and print it.
    Decode(DecodeArgs),
    /// build a packet and print its bytes as hex.
    #[command(subcommand)]
    Encode(EncodeCommand),
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// packet bytes in hex, e.g. `00 04 00 32`.
    #[arg(required = true)]
    bytes: Vec<String>,
    /// reject bytes following the mode of a request.
    #[arg(long)]
    strict: bool,
}

#[derive(Subcommand, Debug)]
enum EncodeCommand {
    /// read request.
    Rrq(RequestArgs),
    /// write request.
    Wrq(RequestArgs),
    /// data block, payload given as text.
    Data { blk: u16, text: String },
    /// acknowledgment.
    Ack { blk: u16 },
    /// error packet; the RFC description is used when no message is given.
    Error { code: u16, message: Option<String> },
}

#[derive(Args, Debug)]
struct RequestArgs {
    /// name of the requested file.
    filename: String,
    /// transfer mode.
    #[arg(short, long, default_value = "octet")]
    mode: String,
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();
    let opts: Opts = Opts::parse();
    debug!(?opts, "parsed arguments");

    match run(opts.subcmd) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(subcmd: SubCommand) -> Result<(), Error> {
    match subcmd {
        SubCommand::Decode(args) => decode(args),
        SubCommand::Encode(cmd) => {
            let packet = build_packet(cmd)?;
            println!("{}", to_hex(&packet.serialize()?));
            Ok(())
        }
    }
}

fn decode(args: DecodeArgs) -> Result<(), Error> {
    let buf = from_hex(&args.bytes.concat())?;
    let opts = if args.strict {
        ParseOptions::strict()
    } else {
        ParseOptions::default()
    };

    match parse_udp_packet_with(&buf, &opts) {
        Ok(packet) => {
            println!("{}", packet);
            if let TftpPacket::Data(data) = &packet {
                println!("payload: {}", convert(data.payload().len() as f64));
            }
            Ok(())
        }
        Err(kind) => {
            let reply = ErrorPacket::from(&kind);
            println!("reply: {}", to_hex(&reply.serialize()?));
            Err(kind.into())
        }
    }
}

fn build_packet(cmd: EncodeCommand) -> Result<TftpPacket, Error> {
    let packet = match cmd {
        EncodeCommand::Rrq(req) => {
            TftpPacket::Rrq(ReadRequestPacket::new(&req.filename, &req.mode))
        }
        EncodeCommand::Wrq(req) => {
            TftpPacket::Wrq(WriteRequestPacket::new(&req.filename, &req.mode))
        }
        EncodeCommand::Data { blk, text } => {
            TftpPacket::Data(DataPacket::new(blk, text.into_bytes()))
        }
        EncodeCommand::Ack { blk } => TftpPacket::Ack(AckPacket::new(blk)),
        EncodeCommand::Error { code, message } => match (message, ErrorCode::try_from(code)) {
            (Some(msg), _) => TftpPacket::Err(ErrorPacket::new(code, &msg)),
            (None, Ok(known)) => TftpPacket::Err(ErrorPacket::from_code(known)),
            (None, Err(code)) => return Err(Error::InvalidErrorCode(code)),
        },
    };

    Ok(packet)
}

fn to_hex(buf: &[u8]) -> String {
    buf.iter()
        .map(|byte| format!("{:02x}", byte))
        .collect::<Vec<_>>()
        .join(" ")
}

fn from_hex(text: &str) -> Result<Vec<u8>, Error> {
    let digits: Vec<u8> = text
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    if digits.len() % 2 != 0 {
        return Err(Error::other("odd number of hex digits"));
    }

    digits
        .chunks(2)
        .map(|pair| {
            let pair = std::str::from_utf8(pair).map_err(Error::other)?;
            u8::from_str_radix(pair, 16)
                .map_err(|_| Error::other(format!("invalid hex byte '{}'", pair)))
        })
        .collect()
}
